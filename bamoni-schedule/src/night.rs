const SECS_PER_HOUR: i64 = 3600;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Whether `hour` falls inside the suppression window `[start_hour, end_hour)`.
///
/// When `start_hour > end_hour` the window crosses midnight. When both are equal the window is
/// empty and never suppresses.
///
/// ```
/// use bamoni_schedule::is_suppressed;
///
/// assert!(is_suppressed(23, 22, 6));
/// assert!(is_suppressed(5, 22, 6));
/// assert!(!is_suppressed(10, 22, 6));
/// ```
#[inline]
pub const fn is_suppressed(hour: u8, start_hour: u8, end_hour: u8) -> bool {
    if start_hour > end_hour {
        hour >= start_hour || hour < end_hour
    } else {
        start_hour <= hour && hour < end_hour
    }
}

/// Hour of day (`0..24`) for an epoch, shifted by a UTC offset in seconds.
#[inline]
pub const fn hour_of_day(epoch: u32, utc_offset_secs: i32) -> u8 {
    let local = epoch as i64 + utc_offset_secs as i64;

    (local.rem_euclid(SECS_PER_DAY) / SECS_PER_HOUR) as u8
}

/// Hours during which the beacon keeps quiet.
///
/// A start hour of `24` is accepted as-is: it can never match, so `NightWindow::new(24, 6)`
/// silences `00:00..06:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NightWindow {
    start_hour: u8,
    end_hour: u8,
}

impl NightWindow {
    #[inline]
    pub const fn new(start_hour: u8, end_hour: u8) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// A window that never suppresses.
    #[inline]
    pub const fn disabled() -> Self {
        Self::new(0, 0)
    }

    #[inline]
    pub const fn crosses_midnight(&self) -> bool {
        self.start_hour > self.end_hour
    }

    #[inline]
    pub const fn is_suppressed(&self, hour: u8) -> bool {
        is_suppressed(hour, self.start_hour, self.end_hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_window() {
        assert!(is_suppressed(23, 22, 6));
        assert!(is_suppressed(22, 22, 6));
        assert!(is_suppressed(0, 22, 6));
        assert!(is_suppressed(5, 22, 6));
        assert!(!is_suppressed(6, 22, 6));
        assert!(!is_suppressed(10, 22, 6));
        assert!(!is_suppressed(21, 22, 6));
    }

    #[test]
    fn same_day_window() {
        let window = NightWindow::new(1, 5);

        assert!(!window.crosses_midnight());
        assert!(!window.is_suppressed(0));
        assert!(window.is_suppressed(1));
        assert!(window.is_suppressed(4));
        assert!(!window.is_suppressed(5));
    }

    #[test]
    fn zero_width_window_never_suppresses() {
        for hour in 0..24 {
            assert!(!is_suppressed(hour, 3, 3));
            assert!(!NightWindow::disabled().is_suppressed(hour));
        }
    }

    #[test]
    fn start_at_24_silences_early_morning() {
        let window = NightWindow::new(24, 6);

        assert!(window.crosses_midnight());

        for hour in 0..24 {
            assert_eq!(window.is_suppressed(hour), hour < 6, "hour {hour}");
        }
    }

    #[test]
    fn hours_from_epoch() {
        // 2026-01-01 17:00:00 UTC
        let epoch = 1_767_286_800;

        assert_eq!(hour_of_day(epoch, 0), 17);
        assert_eq!(hour_of_day(epoch + 3599, 0), 17);
        assert_eq!(hour_of_day(epoch + 3600, 0), 18);
        assert_eq!(hour_of_day(epoch, 9 * 3600), 2);
        assert_eq!(hour_of_day(epoch, -18 * 3600), 23);
        assert_eq!(hour_of_day(0, -1), 23);
    }
}
