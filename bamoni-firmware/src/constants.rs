use bamoni_battery::VoltageDivider;
use bamoni_cycle::BeaconConfig;
use bamoni_frame::frame_len;
use bamoni_schedule::{NightWindow, SamplingPolicy};
use trouble_host::prelude::TxPower;

pub const BAMONI_WAKE_INTERVAL_SECS: u32 = 180;
pub const BAMONI_ADV_DURATION_SECS: u32 = 30;
pub const BAMONI_HISTORY_INTERVAL_MINS: u32 = 12;
/// 12 minutes x 48 = 9.6 hours of history per frame.
pub const BAMONI_HISTORY_LEN: usize = 48;

pub const BAMONI_NIGHT_START_HOUR: u8 = 24;
pub const BAMONI_NIGHT_END_HOUR: u8 = 6;
pub const BAMONI_UTC_OFFSET_SECS: i32 = 0;
/// 2026-01-01 17:00:00 UTC, until something better sets the clock.
pub const BAMONI_BASELINE_EPOCH: u32 = 1_767_286_800;

pub const BAMONI_COMPANY_ID: u16 = 0xFFFF;
pub const BAMONI_NAME: &str = "bamoni-P";
pub const BAMONI_MIN_ADV_INTERVAL_MS: u64 = 100;
pub const BAMONI_MAX_ADV_INTERVAL_MS: u64 = 150;
pub const BAMONI_BLE_TX_POWER: TxPower = TxPower::Plus8dBm;

/// Flags, then the frame as manufacturer data, then the local name.
pub const BAMONI_AD_LEN: usize = 3 + 2 + frame_len(BAMONI_HISTORY_LEN) + 2 + BAMONI_NAME.len();

/// 100k over 22k between the battery and AIN0.
pub static BATTERY_DIVIDER: VoltageDivider = VoltageDivider::new(100_000.0, 22_000.0);

pub const BEACON_CONFIG: BeaconConfig = BeaconConfig {
    identifier: BAMONI_COMPANY_ID,
    wake_interval_secs: BAMONI_WAKE_INTERVAL_SECS,
    advertise_secs: BAMONI_ADV_DURATION_SECS,
    sampling: SamplingPolicy::from_mins(BAMONI_HISTORY_INTERVAL_MINS),
    night: NightWindow::new(BAMONI_NIGHT_START_HOUR, BAMONI_NIGHT_END_HOUR),
    utc_offset_secs: BAMONI_UTC_OFFSET_SECS,
    baseline_epoch: BAMONI_BASELINE_EPOCH,
};
