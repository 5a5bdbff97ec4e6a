//! Crate for the beacon's retained sample history: a fixed-capacity ring buffer of millivolt
//! readings plus the bookkeeping that has to survive the low-power transition.
//!
//! ```
//! use bamoni_history::PersistentState;
//!
//! let mut state = PersistentState::<3>::new();
//!
//! for mv in [100, 200, 300, 400] {
//!     state.record_sample(mv);
//! }
//!
//! assert!(state.is_filled());
//! assert_eq!(state.snapshot_newest_first(), [400, 300, 200]);
//! ```
#![no_std]

mod crc;
mod image;

pub use image::{IMAGE_MAGIC, IMAGE_VERSION, ImageError};

/// A battery reading in millivolts. `0` marks a slot that was never written.
pub type Sample = u16;

/// State that outlives a single wake cycle.
///
/// `C` is the history capacity. Since the broadcast frame carries the capacity in a single byte,
/// `C` must be within `1..=255`, which is checked when the state is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistentState<const C: usize> {
    history: [Sample; C],
    write_cursor: usize,
    filled: bool,
    last_sample_epoch: u32,
    wake_count: u32,
}

impl<const C: usize> PersistentState<C> {
    /// Creates the zero state: empty history, cursor at the start, no wakes recorded.
    #[inline]
    pub const fn new() -> Self {
        const {
            assert!(
                C > 0 && C <= u8::MAX as usize,
                "history capacity must be within 1..=255"
            )
        };

        Self {
            history: [0; C],
            write_cursor: 0,
            filled: false,
            last_sample_epoch: 0,
            wake_count: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        C
    }

    /// Writes `value` at the cursor and advances it, evicting the oldest sample once full.
    pub fn record_sample(&mut self, value: Sample) {
        self.history[self.write_cursor] = value;
        self.write_cursor += 1;

        if self.write_cursor == C {
            self.write_cursor = 0;
            self.filled = true;
        }
    }

    /// Walks all `C` slots starting from the newest one. Slots never written yield `0`.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = Sample> + '_ {
        (0..C).map(move |step| self.history[(self.write_cursor + C - 1 - step) % C])
    }

    /// The full buffer reordered newest-first, regardless of how many slots are valid.
    pub fn snapshot_newest_first(&self) -> [Sample; C] {
        let mut snapshot = [0; C];

        snapshot
            .iter_mut()
            .zip(self.iter_newest_first())
            .for_each(|(slot, sample)| *slot = sample);

        snapshot
    }

    /// The most recently recorded sample, if any sample was ever recorded.
    #[inline]
    pub fn newest(&self) -> Option<Sample> {
        (self.valid_len() > 0).then(|| self.history[(self.write_cursor + C - 1) % C])
    }

    /// Number of slots that hold a recorded sample.
    #[inline]
    pub const fn valid_len(&self) -> usize {
        if self.filled { C } else { self.write_cursor }
    }

    #[inline]
    pub const fn is_filled(&self) -> bool {
        self.filled
    }

    #[inline]
    pub const fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    #[inline]
    pub const fn last_sample_epoch(&self) -> u32 {
        self.last_sample_epoch
    }

    #[inline]
    pub fn set_last_sample_epoch(&mut self, epoch: u32) {
        self.last_sample_epoch = epoch;
    }

    #[inline]
    pub const fn wake_count(&self) -> u32 {
        self.wake_count
    }

    /// Counts a new wake. Returns `true` if this is the first wake of the retained lifetime.
    pub fn begin_wake(&mut self) -> bool {
        let first = self.wake_count == 0;
        self.wake_count = self.wake_count.saturating_add(1);
        first
    }

    /// Resets to the zero state, as on a cold start.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl<const C: usize> Default for PersistentState<C> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
