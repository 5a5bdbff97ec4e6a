//! Time-based rules for a wake cycle: when to append to the history ([`SamplingPolicy`]) and
//! when to stay silent ([`NightWindow`]).
#![no_std]

mod night;
mod sampling;

pub use night::{NightWindow, hour_of_day, is_suppressed};
pub use sampling::{SamplingPolicy, should_sample};
