use bamoni_fmt::{debug, error, info, warn};
use bamoni_frame::{Frame, FrameEncoder};
use bamoni_history::{PersistentState, Sample};
use bamoni_schedule::hour_of_day;
use embedded_hal_async::delay::DelayNs;

use crate::{BeaconConfig, Clock, PowerControl, RetainedStore, Transport, VoltageSensor};

/// What happened to the broadcast in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transmission {
    /// Broadcast for the full window and stopped.
    Sent,
    /// Inside the night window.
    Suppressed,
    /// The transport refused to start; no window was waited out.
    StartFailed,
    /// Broadcast for the full window, but stopping reported an error.
    StopFailed,
    /// No time was available, so neither the history nor the night window could be evaluated.
    NoClock,
}

/// Summary of a finished cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Wake number within the retained lifetime, starting at 1.
    pub wake: u32,
    /// The battery reading, if the sensor produced one.
    pub reading: Option<Sample>,
    /// Whether the reading was appended to the history.
    pub sampled: bool,
    pub transmission: Transmission,
}

/// Runs wake cycles against the device's collaborators.
///
/// Every cycle ends with the retained state stored and the low-power transition requested, no
/// matter which of the steps before it failed.
pub struct WakeCycleController<S, K, T, D, P> {
    config: BeaconConfig,
    encoder: FrameEncoder,
    sensor: S,
    clock: K,
    transport: T,
    delay: D,
    power: P,
}

impl<S, K, T, D, P> WakeCycleController<S, K, T, D, P>
where
    S: VoltageSensor,
    K: Clock,
    T: Transport,
    D: DelayNs,
    P: PowerControl,
{
    pub const fn new(
        config: BeaconConfig,
        sensor: S,
        clock: K,
        transport: T,
        delay: D,
        power: P,
    ) -> Self {
        Self {
            encoder: FrameEncoder::new(config.identifier),
            config,
            sensor,
            clock,
            transport,
            delay,
            power,
        }
    }

    #[inline]
    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    /// Destroys the controller, returning its collaborators.
    pub fn destroy(self) -> (S, K, T, D, P) {
        (
            self.sensor,
            self.clock,
            self.transport,
            self.delay,
            self.power,
        )
    }

    /// Runs one wake cycle, from restoring the retained state to the low-power transition.
    ///
    /// The report is returned once [`PowerControl::enter_low_power`] returns, which it doesn't
    /// on targets where waking restarts the program.
    pub async fn run_cycle<R, const C: usize>(&mut self, store: &mut R) -> CycleReport
    where
        R: RetainedStore<C>,
    {
        let (mut state, first_wake) = self.bootstrap(store);

        let report = self.wake(&mut state, first_wake).await;

        store.store(&state);

        info!("Sleeping for {}s", self.config.wake_interval_secs);
        self.power
            .enter_low_power(self.config.wake_interval_secs)
            .await;

        report
    }

    fn bootstrap<R, const C: usize>(&mut self, store: &mut R) -> (PersistentState<C>, bool)
    where
        R: RetainedStore<C>,
    {
        let mut state = store
            .load()
            .filter(|state| state.wake_count() > 0)
            .unwrap_or_default();

        let first_wake = state.begin_wake();

        if first_wake {
            info!("First wake, setting clock to {}", self.config.baseline_epoch);
            self.clock.set_epoch(self.config.baseline_epoch);
        } else if self.clock.epoch().is_none() {
            // Never behind the history already recorded.
            let epoch = self.config.baseline_epoch.max(state.last_sample_epoch());

            warn!("Clock lost with state retained, setting it to {}", epoch);
            self.clock.set_epoch(epoch);
        }

        (state, first_wake)
    }

    async fn wake<const C: usize>(
        &mut self,
        state: &mut PersistentState<C>,
        first_wake: bool,
    ) -> CycleReport {
        let wake = state.wake_count();

        let reading = match self.sensor.read_millivolts().await {
            Ok(mv) => Some(mv),
            Err(e) => {
                error!("Battery read failed: {}", e);
                None
            }
        };

        let Some(now) = self.clock.epoch() else {
            error!("No time available, skipping history and broadcast");

            return CycleReport {
                wake,
                reading,
                sampled: false,
                transmission: Transmission::NoClock,
            };
        };

        let hour = hour_of_day(now, self.config.utc_offset_secs);

        info!("Wake #{} at {} (hour {}), battery {} mV", wake, now, hour, reading);

        let sampled = match reading {
            Some(mv)
                if self
                    .config
                    .sampling
                    .should_sample(now, state.last_sample_epoch(), first_wake) =>
            {
                state.record_sample(mv);
                state.set_last_sample_epoch(now);
                debug!("History updated, {} samples held", state.valid_len());
                true
            }
            _ => false,
        };

        let transmission = if self.config.night.is_suppressed(hour) {
            info!("Night window, skipping broadcast");
            Transmission::Suppressed
        } else {
            // A failed read goes out as 0, the "no data" value.
            let frame = self
                .encoder
                .encode_state(now, reading.unwrap_or(0), state);

            self.broadcast(&frame).await
        };

        CycleReport {
            wake,
            reading,
            sampled,
            transmission,
        }
    }

    async fn broadcast(&mut self, frame: &Frame) -> Transmission {
        if let Err(e) = self.transport.start(frame).await {
            error!("Failed to start broadcast: {}", e);
            return Transmission::StartFailed;
        }

        info!("Broadcasting {} bytes for {}s", frame.len(), self.config.advertise_secs);
        self.delay
            .delay_ms(self.config.advertise_secs.saturating_mul(1000))
            .await;

        match self.transport.stop().await {
            Ok(()) => Transmission::Sent,
            Err(e) => {
                error!("Failed to stop broadcast: {}", e);
                Transmission::StopFailed
            }
        }
    }
}
