use bamoni_schedule::{NightWindow, SamplingPolicy};

/// Settings for every wake cycle. [`BeaconConfig::new`] gives the reference configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeaconConfig {
    /// First two bytes of every frame, doubling as the BLE company identifier.
    pub identifier: u16,
    /// Fixed timer for the next wake. Not adjusted for time spent in the cycle.
    pub wake_interval_secs: u32,
    /// How long each broadcast runs before it is stopped.
    pub advertise_secs: u32,
    pub sampling: SamplingPolicy,
    pub night: NightWindow,
    /// Offset applied to the epoch before taking the hour for the night window.
    pub utc_offset_secs: i32,
    /// Clock value set on the first wake, when the clock source has nothing better.
    pub baseline_epoch: u32,
}

impl BeaconConfig {
    pub const fn new() -> Self {
        Self {
            identifier: 0xFFFF,
            wake_interval_secs: 180,
            advertise_secs: 30,
            sampling: SamplingPolicy::from_mins(12),
            night: NightWindow::new(24, 6),
            utc_offset_secs: 0,
            // 2026-01-01 17:00:00 UTC
            baseline_epoch: 1_767_286_800,
        }
    }
}

impl Default for BeaconConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
