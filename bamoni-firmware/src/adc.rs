use bamoni_cycle::VoltageSensor;
use bamoni_fmt::debug;
use embassy_nrf::{
    peripherals,
    saadc::{ChannelConfig, Config, Resolution, Saadc},
};

use crate::{Irqs, constants::BATTERY_DIVIDER};

/// Internal 0.6 V reference at the default 1/6 gain.
const FULL_SCALE_MV: f32 = 3600.0;
const MAX_SAMPLE: i16 = 4095;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The pin sits at or above full scale, so the divided voltage is unknown.
    Saturated,
}

#[inline]
fn to_millivolts(sample: i16, reference: f32) -> f32 {
    ((sample.max(0) as f32) * reference) / 4096.0
}

/// Battery voltage through the resistor divider on AIN0.
pub struct BatterySensor {
    saadc: Saadc<'static, 1>,
}

impl BatterySensor {
    pub async fn new(saadc: peripherals::SAADC, pin: peripherals::P0_02) -> Self {
        let mut config = Config::default();

        config.resolution = Resolution::_12BIT;

        let saadc = Saadc::new(saadc, Irqs, config, [ChannelConfig::single_ended(pin)]);

        saadc.calibrate().await;

        Self { saadc }
    }
}

impl VoltageSensor for BatterySensor {
    type Error = SensorError;

    async fn read_millivolts(&mut self) -> Result<u16, Self::Error> {
        let mut buf = [0; 1];

        self.saadc.sample(&mut buf).await;

        let [raw] = buf;

        debug!("Battery ADC raw {}", raw);

        if raw >= MAX_SAMPLE {
            return Err(SensorError::Saturated);
        }

        Ok(BATTERY_DIVIDER.battery_millivolts(to_millivolts(raw, FULL_SCALE_MV)))
    }
}
