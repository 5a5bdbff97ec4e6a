//! Explicit byte image of [`PersistentState`], written before sleep and read back on wake.
//!
//! Layout (little-endian, unpadded):
//!
//! ```text
//! magic[4] | version | capacity | cursor | flags | last_sample_epoch[4] | wake_count[4]
//!          | history[C * 2] | crc8
//! ```
//!
//! The history slots are stored in buffer order, not newest-first, so a load restores the
//! cursor position exactly.

use crate::{PersistentState, Sample, crc::crc8};

pub const IMAGE_MAGIC: [u8; 4] = *b"BMNI";
pub const IMAGE_VERSION: u8 = 1;

const HEADER_LEN: usize = 16;
const FLAG_FILLED: u8 = 0b0000_0001;

/// Reasons a retained image can't be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageError {
    /// The buffer is shorter than [`PersistentState::IMAGE_LEN`].
    BufferTooSmall { needed: usize, actual: usize },
    /// No image was ever written here (or it was overwritten).
    BadMagic,
    UnsupportedVersion(u8),
    /// The image was written by a build with a different history capacity.
    CapacityMismatch { expected: usize, found: u8 },
    CursorOutOfRange(u8),
    Checksum,
}

impl<const C: usize> PersistentState<C> {
    /// Size in bytes of the retained image for this capacity.
    pub const IMAGE_LEN: usize = HEADER_LEN + C * size_of::<Sample>() + 1;

    /// Serializes the state into the first [`Self::IMAGE_LEN`] bytes of `buf`.
    pub fn write_image(&self, buf: &mut [u8]) -> Result<usize, ImageError> {
        let actual = buf.len();
        let image = buf
            .get_mut(..Self::IMAGE_LEN)
            .ok_or(ImageError::BufferTooSmall {
                needed: Self::IMAGE_LEN,
                actual,
            })?;

        let (body, crc) = image.split_at_mut(Self::IMAGE_LEN - 1);
        let (header, history) = body.split_at_mut(HEADER_LEN);

        header[..4].copy_from_slice(&IMAGE_MAGIC);
        header[4] = IMAGE_VERSION;
        header[5] = C as u8;
        header[6] = self.write_cursor as u8;
        header[7] = if self.filled { FLAG_FILLED } else { 0 };
        header[8..12].copy_from_slice(&self.last_sample_epoch.to_le_bytes());
        header[12..16].copy_from_slice(&self.wake_count.to_le_bytes());

        history
            .chunks_exact_mut(size_of::<Sample>())
            .zip(self.history)
            .for_each(|(chunk, sample)| chunk.copy_from_slice(&sample.to_le_bytes()));

        crc[0] = crc8(body);

        Ok(Self::IMAGE_LEN)
    }

    /// Restores a state previously written with [`Self::write_image`].
    ///
    /// The header is validated before the checksum, so an image left by a build with another
    /// capacity is reported as [`ImageError::CapacityMismatch`] whatever its length.
    pub fn read_image(buf: &[u8]) -> Result<Self, ImageError> {
        let too_small = ImageError::BufferTooSmall {
            needed: Self::IMAGE_LEN,
            actual: buf.len(),
        };

        let header = buf.get(..HEADER_LEN).ok_or(too_small)?;

        if header[..4] != IMAGE_MAGIC {
            return Err(ImageError::BadMagic);
        }

        if header[4] != IMAGE_VERSION {
            return Err(ImageError::UnsupportedVersion(header[4]));
        }

        if usize::from(header[5]) != C {
            return Err(ImageError::CapacityMismatch {
                expected: C,
                found: header[5],
            });
        }

        if usize::from(header[6]) >= C {
            return Err(ImageError::CursorOutOfRange(header[6]));
        }

        let image = buf.get(..Self::IMAGE_LEN).ok_or(too_small)?;
        let (body, crc) = image.split_at(Self::IMAGE_LEN - 1);
        let history = &body[HEADER_LEN..];

        if crc8(body) != crc[0] {
            return Err(ImageError::Checksum);
        }

        let mut state = Self::new();

        state.write_cursor = usize::from(header[6]);
        state.filled = header[7] & FLAG_FILLED != 0;
        state.last_sample_epoch = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        state.wake_count = u32::from_le_bytes([header[12], header[13], header[14], header[15]]);

        state
            .history
            .iter_mut()
            .zip(history.chunks_exact(size_of::<Sample>()))
            .for_each(|(slot, chunk)| *slot = Sample::from_le_bytes([chunk[0], chunk[1]]));

        Ok(state)
    }
}
