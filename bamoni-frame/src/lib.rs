//! Encoding of the beacon's broadcast frame, and the BLE advertising data that carries it.
//!
//! A frame is a fixed-length, little-endian record:
//!
//! ```text
//! identifier: u16 | epoch: u32 | current_mv: u16 | history_count: u8 | history: [u16; C]
//! ```
//!
//! `history_count` is always the history capacity `C`, and the history is ordered
//! newest-first. Slots holding `0` carry no data: the frame has no separate validity bitmap,
//! so a genuine 0 mV reading can't be told apart from an empty slot.
#![no_std]

mod ad;
mod decode;

use bamoni_history::{PersistentState, Sample};
use heapless::Vec;

pub use ad::{AdError, BeaconAd};
pub use decode::{FrameError, FrameView};

/// Bytes in front of the history: identifier, epoch, current reading and history count.
pub const FRAME_HEADER_LEN: usize = 9;

/// The history count is a single byte.
pub const MAX_HISTORY_LEN: usize = u8::MAX as usize;

pub const MAX_FRAME_LEN: usize = frame_len(MAX_HISTORY_LEN);

/// Encoded length of a frame carrying `capacity` history slots.
#[inline]
pub const fn frame_len(capacity: usize) -> usize {
    FRAME_HEADER_LEN + capacity * size_of::<Sample>()
}

/// An encoded frame, ready to hand over to the radio.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME_LEN>,
}

impl Frame {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decoded view over this frame's fields.
    #[inline]
    pub fn view(&self) -> FrameView<'_> {
        FrameView::new_unchecked(&self.bytes)
    }
}

impl AsRef<[u8]> for Frame {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encodes a frame from a newest-first history of exactly `C` samples.
///
/// ```
/// use bamoni_frame::{encode, frame_len};
///
/// let frame = encode(0xFFFF, 1_767_286_800, 12_400, &[12_400, 12_380, 0]);
///
/// assert_eq!(frame.len(), frame_len(3));
/// assert_eq!(&frame.as_bytes()[..2], &[0xFF, 0xFF]);
/// ```
pub fn encode<const C: usize>(
    identifier: u16,
    now_epoch: u32,
    current: Sample,
    history_newest_first: &[Sample; C],
) -> Frame {
    const {
        assert!(
            C > 0 && C <= MAX_HISTORY_LEN,
            "history capacity must be within 1..=255"
        )
    };

    let mut bytes: Vec<u8, MAX_FRAME_LEN> = Vec::new();

    bytes.extend(identifier.to_le_bytes());
    bytes.extend(now_epoch.to_le_bytes());
    bytes.extend(current.to_le_bytes());
    bytes.extend([C as u8]);
    bytes.extend(
        history_newest_first
            .iter()
            .flat_map(|sample| sample.to_le_bytes()),
    );

    Frame { bytes }
}

/// Frame encoder bound to the beacon's identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameEncoder {
    identifier: u16,
}

impl FrameEncoder {
    #[inline]
    pub const fn new(identifier: u16) -> Self {
        Self { identifier }
    }

    #[inline]
    pub const fn identifier(&self) -> u16 {
        self.identifier
    }

    #[inline]
    pub fn encode<const C: usize>(
        &self,
        now_epoch: u32,
        current: Sample,
        history_newest_first: &[Sample; C],
    ) -> Frame {
        encode(self.identifier, now_epoch, current, history_newest_first)
    }

    /// Encodes the current reading along with the retained history.
    #[inline]
    pub fn encode_state<const C: usize>(
        &self,
        now_epoch: u32,
        current: Sample,
        state: &PersistentState<C>,
    ) -> Frame {
        self.encode(now_epoch, current, &state.snapshot_newest_first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layout() {
        let frame = encode(0xFFFF, 0x6956_A210, 12_400, &[12_400, 12_380, 0]);

        assert_eq!(
            frame.as_bytes(),
            &[
                0xFF, 0xFF, // identifier
                0x10, 0xA2, 0x56, 0x69, // epoch
                0x70, 0x30, // current
                0x03, // history count
                0x70, 0x30, 0x5C, 0x30, 0x00, 0x00 // history
            ]
        );
    }

    #[test]
    fn frame_length_is_fixed_by_capacity() {
        assert_eq!(encode(1, 2, 3, &[0; 1]).len(), 11);
        assert_eq!(encode(1, 2, 3, &[0; 3]).len(), 15);
        assert_eq!(encode(1, 2, 3, &[0; 48]).len(), 105);
        assert_eq!(encode(1, 2, 3, &[7; 255]).len(), MAX_FRAME_LEN);
        assert_eq!(frame_len(48), 105);
    }

    #[test]
    fn history_count_is_capacity_not_valid_entries() {
        let state = PersistentState::<48>::new();
        let frame = FrameEncoder::new(0xFFFF).encode_state(0, 0, &state);

        assert_eq!(frame.as_bytes()[8], 48);
        assert!(frame.as_bytes()[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn encoded_state_is_newest_first() {
        let mut state = PersistentState::<3>::new();

        for mv in [100, 200, 300, 400] {
            state.record_sample(mv);
        }

        let frame = FrameEncoder::new(0xFFFF).encode_state(1_000, 400, &state);
        let view = frame.view();

        assert_eq!(view.current_mv(), 400);
        assert!(view.history().eq([400, 300, 200]));
    }

    #[test]
    fn encoding_is_deterministic() {
        let encoder = FrameEncoder::new(0x1234);
        let history = [5, 4, 3, 2];

        assert_eq!(
            encoder.encode(99, 5, &history),
            encoder.encode(99, 5, &history)
        );
    }
}
