//! Crate for recovering a battery voltage from the divided voltage seen at an ADC pin, via
//! [`VoltageDivider`].
#![no_std]

/// A resistor divider with `r_top` between the battery and the ADC pin, and `r_bottom` between
/// the pin and ground.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoltageDivider {
    r_top: f32,
    r_bottom: f32,
}

impl VoltageDivider {
    /// Creates a new divider from its two resistor values, in any consistent unit.
    #[inline]
    pub const fn new(r_top: f32, r_bottom: f32) -> Self {
        Self { r_top, r_bottom }
    }

    /// The factor between battery voltage and pin voltage.
    ///
    /// ```
    /// use bamoni_battery::VoltageDivider;
    ///
    /// let divider = VoltageDivider::new(100_000.0, 22_000.0);
    ///
    /// assert_eq!(divider.ratio(), 122_000.0 / 22_000.0);
    /// ```
    #[inline]
    pub fn ratio(&self) -> f32 {
        (self.r_top + self.r_bottom) / self.r_bottom
    }

    /// Scales a pin reading in millivolts back up to the battery voltage, saturating at
    /// `u16::MAX`. Readings that aren't finite scale to `0`, the "no data" value.
    ///
    /// ```
    /// use bamoni_battery::VoltageDivider;
    ///
    /// let divider = VoltageDivider::new(100_000.0, 22_000.0);
    ///
    /// assert_eq!(divider.battery_millivolts(2_200.0), 12_200);
    /// ```
    pub fn battery_millivolts(&self, pin_millivolts: f32) -> u16 {
        let scaled = pin_millivolts * (self.r_top + self.r_bottom) / self.r_bottom;

        if scaled.is_finite() {
            // `as` saturates and truncates toward zero.
            scaled as u16
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVIDER: VoltageDivider = VoltageDivider::new(100_000.0, 22_000.0);

    #[test]
    fn scales_pin_voltage() {
        let expect_results: [(f32, u16); 4] =
            [(0.0, 0), (1_100.0, 6_100), (2_200.0, 12_200), (2_500.0, 13_863)];

        for (pin, battery) in expect_results {
            assert_eq!(DIVIDER.battery_millivolts(pin), battery);
        }
    }

    #[test]
    fn saturates_out_of_range_readings() {
        assert_eq!(DIVIDER.battery_millivolts(20_000.0), u16::MAX);
        assert_eq!(DIVIDER.battery_millivolts(-5.0), 0);
        assert_eq!(DIVIDER.battery_millivolts(f32::NAN), 0);
        assert_eq!(DIVIDER.battery_millivolts(f32::INFINITY), 0);
    }

    #[test]
    fn unity_divider() {
        let divider = VoltageDivider::new(0.0, 1.0);

        assert_eq!(divider.ratio(), 1.0);
        assert_eq!(divider.battery_millivolts(3_300.0), 3_300);
    }
}
