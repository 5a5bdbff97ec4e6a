use heapless::Vec;

const BR_EDR_NOT_SUPPORTED: u8 = 4;
const LE_GENERAL_DISCOVERABLE: u8 = 2;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
const AD_TYPE_MANUFACTURER_DATA: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdError {
    /// The advertising data would exceed the buffer capacity.
    Overflow { needed: usize, capacity: usize },
    /// A single AD structure can hold at most 254 bytes of data.
    FieldTooLong(usize),
}

/// Builder for the advertising data: flags first, then whatever structures are added.
///
/// The frame goes in as manufacturer specific data, its leading identifier taking the place of
/// the company identifier.
pub struct BeaconAd<const N: usize> {
    buffer: Vec<u8, N>,
}

impl<const N: usize> BeaconAd<N> {
    #[inline]
    pub fn add_manufacturer_data(&mut self, data: &[u8]) -> Result<&mut Self, AdError> {
        self.add_structure(AD_TYPE_MANUFACTURER_DATA, data)
    }

    #[inline]
    pub fn add_local_name(&mut self, name: &str) -> Result<&mut Self, AdError> {
        self.add_structure(AD_TYPE_COMPLETE_LOCAL_NAME, name.as_bytes())
    }

    fn add_structure(&mut self, ad_type: u8, data: &[u8]) -> Result<&mut Self, AdError> {
        let len = u8::try_from(data.len() + 1).map_err(|_| AdError::FieldTooLong(data.len()))?;
        let needed = self.buffer.len() + 1 + usize::from(len);

        if needed > N {
            return Err(AdError::Overflow {
                needed,
                capacity: N,
            });
        }

        self.buffer.extend([len, ad_type]);
        self.buffer.extend(data.iter().copied());

        Ok(self)
    }

    #[inline]
    pub fn encode(&self) -> &[u8] {
        &self.buffer
    }
}

impl<const N: usize> Default for BeaconAd<N> {
    #[inline]
    fn default() -> Self {
        const { assert!(N >= 3, "advertising data must fit the flags structure") };

        let buffer = Vec::from_iter([
            0x02,
            AD_TYPE_FLAGS,
            LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED,
        ]);

        Self { buffer }
    }
}
