//! Dimmer driven from a dedicated control task.
//!
//! The [`DimmerTask`] owns the [`Dimmer`] and is the only code touching the
//! hardware. Callers keep a [`TaskDimmer`] handle and post absolute duty
//! values through a [`DimmerChannel`]. Values posted faster than the task
//! consumes them collapse into the most recent one.
//!
//! # Usage
//!
//! ```ignore
//! static ALLOCATOR: SharedAllocator = SharedAllocator::new();
//! static CHANNEL: DimmerChannel = DimmerChannel::new();
//!
//! #[embassy_executor::task]
//! async fn dimmer_task(task: DimmerTask<'static, Mcpwm>) {
//!     if let Err(error) = task.run().await {
//!         panic!("dimmer task failed: {}", error);
//!     }
//! }
//!
//! let (mut dimmer, task) =
//!     TaskDimmer::new(&CHANNEL, &ALLOCATOR, mcpwm, DimmerConfig::new(2, 5));
//! spawner.must_spawn(dimmer_task(task));
//! dimmer.set_power(0.5);
//! ```

use crate::allocator::{DEFAULT_GROUPS, SharedAllocator};
use crate::channel::{Delivery, DimmerChannel, DimmerCommand, Receiver, Sender};
use crate::config::DimmerConfig;
use crate::dimmer::{Dimmer, check_frequency};
use crate::error::{DimmerError, TrySendError};
use crate::phase::{clamp_duty, duty_to_power, power_to_duty};
use crate::timebase::{Pin, Timebase};

/// Caller-side handle of a task-driven dimmer
pub struct TaskDimmer<'a> {
    generator_pin: Pin,
    sync_pin: Pin,
    duty: u16,
    commands: Sender<'a>,
}

/// Control task owning the hardware of a task-driven dimmer
///
/// Spawn [`DimmerTask::run`] on the executor.
pub struct DimmerTask<'a, T: Timebase, const GROUPS: usize = DEFAULT_GROUPS> {
    timebase: T,
    config: DimmerConfig,
    allocator: &'a SharedAllocator<GROUPS>,
    commands: Receiver<'a>,
}

impl<'a> TaskDimmer<'a> {
    /// Create the handle and its control task
    ///
    /// Nothing is programmed until the task runs. Duty values posted before
    /// that are kept in the channel and applied once the dimmer exists.
    pub fn new<T: Timebase, const GROUPS: usize>(
        channel: &'a DimmerChannel,
        allocator: &'a SharedAllocator<GROUPS>,
        timebase: T,
        config: DimmerConfig,
    ) -> (Self, DimmerTask<'a, T, GROUPS>) {
        let handle = Self {
            generator_pin: config.generator_pin,
            sync_pin: config.sync_pin,
            duty: 0,
            commands: channel.sender(),
        };
        let task = DimmerTask {
            timebase,
            config,
            allocator,
            commands: channel.receiver(),
        };
        (handle, task)
    }

    /// Request a duty in ticks, saturating at the half-cycle length
    ///
    /// Never fails: an undeliverable request is logged and the value stays
    /// cached.
    pub fn set_duty(&mut self, duty: u16) {
        self.duty = clamp_duty(duty);
        match self.commands.send(DimmerCommand::SetDuty(self.duty)) {
            Ok(Delivery::Posted) => {}
            Ok(Delivery::Replaced) => {
                info!(
                    "[TaskDimmer.set_duty] generator {}: unconsumed duty replaced by {}",
                    self.generator_pin, self.duty
                );
            }
            Err(TrySendError(_)) => {
                warn!(
                    "[TaskDimmer.set_duty] generator {}: control task is gone, duty {} not delivered",
                    self.generator_pin, self.duty
                );
            }
        }
    }

    /// Request a fraction of full power (0.0-1.0)
    pub fn set_power(&mut self, power: f32) {
        self.set_duty(power_to_duty(power));
    }

    /// Fraction of full power last requested
    ///
    /// Reflects the cached request, which the task may not have applied yet.
    pub fn power(&self) -> f32 {
        duty_to_power(self.duty)
    }

    /// Duty last requested
    pub const fn duty(&self) -> u16 {
        self.duty
    }

    pub const fn generator_pin(&self) -> Pin {
        self.generator_pin
    }

    pub const fn sync_pin(&self) -> Pin {
        self.sync_pin
    }

    /// Ask the control task to delete the dimmer and exit
    pub fn delete(self) {
        if self.commands.send(DimmerCommand::Shutdown).is_err() {
            warn!(
                "[TaskDimmer.delete] generator {}: control task already gone",
                self.generator_pin
            );
        }
    }
}

impl<T: Timebase, const GROUPS: usize> DimmerTask<'_, T, GROUPS> {
    /// Create the dimmer and apply posted duties until shutdown
    ///
    /// Returns the error that ended the task. A hardware fault leaves the
    /// peripheral in an unknown state and should be treated as fatal.
    pub async fn run(self) -> Result<(), DimmerError<T::Error>> {
        let commands = self.commands;
        let result = self.drive().await;
        commands.close();
        if let Err(error) = &result {
            warn!("[DimmerTask.run] task ended: {}", error);
        }
        result
    }

    async fn drive(self) -> Result<(), DimmerError<T::Error>> {
        let Self {
            timebase,
            config,
            allocator,
            commands,
        } = self;

        check_frequency(config.frequency_hz)?;
        let group =
            allocator.lock(|allocator| allocator.claim(config.generator_pin, config.sync_pin))?;
        let mut dimmer = Dimmer::bind(timebase, config, group)?;
        dimmer.start()?;
        info!(
            "[DimmerTask.run] generator {} running in group {}",
            config.generator_pin, group
        );

        loop {
            match commands.receive().await {
                DimmerCommand::SetDuty(duty) => dimmer.set_duty(duty)?,
                DimmerCommand::Shutdown => break,
            }
        }

        dimmer.delete()?;
        info!("[DimmerTask.run] generator {} deleted", config.generator_pin);
        Ok(())
    }
}
