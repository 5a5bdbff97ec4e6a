use bamoni_cycle::PowerControl;
use embassy_time::Timer;

/// Sleeps on the RTC timer with the executor idle (System ON, WFE).
///
/// The nRF52840 can't leave System OFF on a timer, so this is as low as a timed wake goes.
/// Execution resumes after the timer instead of restarting.
pub struct TimerSleep;

impl PowerControl for TimerSleep {
    async fn enter_low_power(&mut self, wake_after_secs: u32) {
        Timer::after_secs(u64::from(wake_after_secs)).await;
    }
}
