//! The beacon's wake cycle: restore retained state, read the battery, update the history, and
//! broadcast unless it is night, then hand over to the low-power state.
//!
//! All hardware lives behind the traits in this crate, so the cycle runs the same on the
//! device and in host tests.
#![no_std]

mod config;
mod controller;
mod store;

use bamoni_frame::Frame;
use bamoni_history::{PersistentState, Sample};

pub use config::BeaconConfig;
pub use controller::{CycleReport, Transmission, WakeCycleController};
pub use store::ImageStore;

/// Bound for collaborator errors: loggable, never handled beyond that.
#[cfg(feature = "defmt")]
pub trait CollaboratorError: core::fmt::Debug + defmt::Format {}

#[cfg(feature = "defmt")]
impl<E: core::fmt::Debug + defmt::Format> CollaboratorError for E {}

/// Bound for collaborator errors: loggable, never handled beyond that.
#[cfg(not(feature = "defmt"))]
pub trait CollaboratorError: core::fmt::Debug {}

#[cfg(not(feature = "defmt"))]
impl<E: core::fmt::Debug> CollaboratorError for E {}

/// Source of the battery reading, already scaled to millivolts at the battery.
#[allow(async_fn_in_trait)]
pub trait VoltageSensor {
    type Error: CollaboratorError;

    async fn read_millivolts(&mut self) -> Result<Sample, Self::Error>;
}

/// Wall clock in seconds since the Unix epoch.
pub trait Clock {
    /// Current epoch, or `None` while the clock hasn't been set.
    fn epoch(&self) -> Option<u32>;

    fn set_epoch(&mut self, epoch: u32);
}

/// The radio. A started broadcast keeps going until [`Transport::stop`] is called.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Error: CollaboratorError;

    async fn start(&mut self, frame: &Frame) -> Result<(), Self::Error>;

    async fn stop(&mut self) -> Result<(), Self::Error>;
}

/// The low-power transition that ends every cycle.
#[allow(async_fn_in_trait)]
pub trait PowerControl {
    /// Enters the low-power state, waking again after `wake_after_secs`. On targets where
    /// waking restarts the program this never returns.
    async fn enter_low_power(&mut self, wake_after_secs: u32);
}

/// Keeps [`PersistentState`] across the low-power transition.
pub trait RetainedStore<const C: usize> {
    /// The state left by the previous cycle, or `None` after a cold start.
    fn load(&mut self) -> Option<PersistentState<C>>;

    fn store(&mut self, state: &PersistentState<C>);
}
