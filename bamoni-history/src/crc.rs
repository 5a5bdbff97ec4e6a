const CRC8_POLYNOMIAL: u8 = 0x31;
const CRC8_INIT: u8 = u8::MAX;

/// CRC-8 with polynomial 0x31 and initial value 0xFF, MSB first.
#[inline]
pub(crate) fn crc8(data: &[u8]) -> u8 {
    data.iter().fold(CRC8_INIT, |crc, &byte| {
        (0..8).fold(crc ^ byte, |crc, _| {
            if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLYNOMIAL
            } else {
                crc << 1
            }
        })
    })
}
