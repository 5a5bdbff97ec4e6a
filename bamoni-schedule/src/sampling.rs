/// Decides whether a wake should append a sample to the history.
///
/// The first wake always samples so the history is seeded. Otherwise a sample is due once at
/// least `interval_secs` have elapsed since the last one. The elapsed time is computed signed:
/// a clock that went backwards reads as "not yet elapsed" instead of wrapping around.
///
/// ```
/// use bamoni_schedule::should_sample;
///
/// assert!(should_sample(1000, 280, false, 720));
/// assert!(!should_sample(999, 280, false, 720));
/// assert!(should_sample(0, 0, true, 720));
/// ```
#[inline]
pub const fn should_sample(
    now_epoch: u32,
    last_sample_epoch: u32,
    is_first_wake: bool,
    interval_secs: u32,
) -> bool {
    is_first_wake || (now_epoch as i64 - last_sample_epoch as i64) >= interval_secs as i64
}

/// The history cadence, decoupled from however often the device wakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplingPolicy {
    interval_secs: u32,
}

impl SamplingPolicy {
    #[inline]
    pub const fn from_secs(interval_secs: u32) -> Self {
        Self { interval_secs }
    }

    /// Saturates at `u32::MAX` seconds.
    #[inline]
    pub const fn from_mins(interval_mins: u32) -> Self {
        Self::from_secs(interval_mins.saturating_mul(60))
    }

    #[inline]
    pub const fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    #[inline]
    pub const fn should_sample(
        &self,
        now_epoch: u32,
        last_sample_epoch: u32,
        is_first_wake: bool,
    ) -> bool {
        should_sample(
            now_epoch,
            last_sample_epoch,
            is_first_wake,
            self.interval_secs,
        )
    }
}
