#![no_std]

#[macro_use]
mod log;

pub mod allocator;
pub mod channel;
pub mod config;
pub mod dimmer;
pub mod error;
pub mod phase;
pub mod task_dimmer;
pub mod timebase;

pub use allocator::{ResourceAllocator, SharedAllocator};
pub use channel::{Delivery, DimmerChannel, DimmerCommand};
pub use config::DimmerConfig;
pub use dimmer::{Dimmer, DimmerState};
pub use error::{AllocError, DimmerError};
pub use phase::{DUTY_MAX, MAX_FREQUENCY_HZ, Polarity, duty_to_power, power_to_duty};
pub use task_dimmer::{DimmerTask, TaskDimmer};
pub use timebase::{GroupId, OutputLevel, Pin, Timebase, TimerConfig};

pub use embassy_time::Duration;
