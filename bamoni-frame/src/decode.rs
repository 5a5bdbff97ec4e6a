use bamoni_history::Sample;

use crate::{FRAME_HEADER_LEN, frame_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer bytes than the fixed header.
    Truncated(usize),
    /// The byte count disagrees with the declared history count.
    LengthMismatch { expected: usize, actual: usize },
}

/// Borrowed, validated view over an encoded frame, as a receiver would see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameView<'a> {
    bytes: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// Validates `bytes` as a frame.
    ///
    /// ```
    /// use bamoni_frame::{FrameView, encode};
    ///
    /// let frame = encode(0xFFFF, 60, 12_000, &[12_000, 0]);
    /// let view = FrameView::parse(frame.as_bytes()).unwrap();
    ///
    /// assert_eq!(view.epoch(), 60);
    /// assert_eq!(view.history_count(), 2);
    /// ```
    pub fn parse(bytes: &'a [u8]) -> Result<Self, FrameError> {
        if bytes.len() < FRAME_HEADER_LEN {
            return Err(FrameError::Truncated(bytes.len()));
        }

        let expected = frame_len(usize::from(bytes[8]));

        if bytes.len() != expected {
            return Err(FrameError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self { bytes })
    }

    #[inline]
    pub(crate) fn new_unchecked(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn identifier(&self) -> u16 {
        u16::from_le_bytes([self.bytes[0], self.bytes[1]])
    }

    #[inline]
    pub fn epoch(&self) -> u32 {
        u32::from_le_bytes([self.bytes[2], self.bytes[3], self.bytes[4], self.bytes[5]])
    }

    #[inline]
    pub fn current_mv(&self) -> Sample {
        Sample::from_le_bytes([self.bytes[6], self.bytes[7]])
    }

    #[inline]
    pub fn history_count(&self) -> u8 {
        self.bytes[8]
    }

    /// History samples, newest first. Zero means the slot held no data.
    pub fn history(&self) -> impl Iterator<Item = Sample> + 'a {
        let bytes: &'a [u8] = self.bytes;

        bytes[FRAME_HEADER_LEN..]
            .chunks_exact(size_of::<Sample>())
            .map(|chunk| Sample::from_le_bytes([chunk[0], chunk[1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;

    #[test]
    fn parse_reads_every_field() {
        let frame = encode(0xBEEF, 1_767_286_800, 12_345, &[12_345, 12_300, 0, 0]);
        let view = FrameView::parse(frame.as_bytes()).unwrap();

        assert_eq!(view.identifier(), 0xBEEF);
        assert_eq!(view.epoch(), 1_767_286_800);
        assert_eq!(view.current_mv(), 12_345);
        assert_eq!(view.history_count(), 4);
        assert!(view.history().eq([12_345, 12_300, 0, 0]));
    }

    #[test]
    fn parse_rejects_short_header() {
        assert_eq!(FrameView::parse(&[]), Err(FrameError::Truncated(0)));
        assert_eq!(FrameView::parse(&[0xFF; 8]), Err(FrameError::Truncated(8)));
    }

    #[test]
    fn parse_rejects_count_mismatch() {
        let frame = encode(0xFFFF, 0, 0, &[1, 2, 3]);
        let bytes = frame.as_bytes();

        assert_eq!(
            FrameView::parse(&bytes[..bytes.len() - 1]),
            Err(FrameError::LengthMismatch {
                expected: 15,
                actual: 14
            })
        );

        let mut longer = [0u8; 17];
        longer[..15].copy_from_slice(bytes);

        assert_eq!(
            FrameView::parse(&longer),
            Err(FrameError::LengthMismatch {
                expected: 15,
                actual: 17
            })
        );
    }
}
