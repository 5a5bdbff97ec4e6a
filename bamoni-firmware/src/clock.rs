use bamoni_cycle::Clock;
use embassy_time::Instant;

/// Wall clock kept as an epoch anchored to the uptime timer.
///
/// Starts unset. The RTC behind [`Instant`] keeps running through the idle sleep, so the epoch
/// only has to be set again after a reset.
#[derive(Debug, Default)]
pub struct UptimeClock {
    base: Option<(u32, Instant)>,
}

impl UptimeClock {
    pub const fn new() -> Self {
        Self { base: None }
    }
}

impl Clock for UptimeClock {
    fn epoch(&self) -> Option<u32> {
        let (epoch, at) = self.base?;
        let elapsed = u32::try_from(at.elapsed().as_secs()).unwrap_or(u32::MAX);

        Some(epoch.saturating_add(elapsed))
    }

    fn set_epoch(&mut self, epoch: u32) {
        self.base = Some((epoch, Instant::now()));
    }
}
