//! Synchronous dimmer channel.
//!
//! A [`Dimmer`] owns one timer, comparator and generator of a [`Timebase`].
//! Duty updates are written straight to the compare register, which the
//! hardware latches at the next zero crossing.
//!
//! Not safe for concurrent use: the caller must keep a single writer per
//! dimmer. Use [`TaskDimmer`](crate::TaskDimmer) to drive a dimmer from
//! several contexts.

use embassy_time::Duration;

use crate::allocator::ResourceAllocator;
use crate::config::DimmerConfig;
use crate::error::DimmerError;
use crate::phase::{
    DUTY_MAX, MAX_FREQUENCY_HZ, Polarity, clamp_duty, conduction_time, duty_to_power, half_cycle,
    power_to_duty, resolution_hz,
};
use crate::timebase::{GroupId, OutputLevel, Pin, Timebase, TimerConfig};

/// Lifecycle state of a [`Dimmer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerState {
    /// Hardware programmed, output forced off
    Configured,
    /// Output follows the phase-control waveform
    Running,
    /// Output forced off
    Stopped,
    /// Hardware binding torn down
    Released,
}

/// Phase-control dimmer bound to one generator pin
pub struct Dimmer<T: Timebase> {
    timebase: T,
    timer: Option<T::Timer>,
    generator: Option<T::Generator>,
    config: DimmerConfig,
    group: GroupId,
    duty: u16,
    state: DimmerState,
}

type Hardware<'a, T> = (
    &'a mut T,
    &'a mut <T as Timebase>::Timer,
    &'a mut <T as Timebase>::Generator,
);

impl<T: Timebase> Dimmer<T> {
    /// Reserve resources and program the time-base
    ///
    /// The dimmer starts with duty 0 and its output forced low. Resource
    /// conflicts leave the allocator untouched. A hardware fault keeps the
    /// reservations; the partially programmed peripheral is not rolled back.
    pub fn create<const GROUPS: usize>(
        allocator: &mut ResourceAllocator<GROUPS>,
        timebase: T,
        config: DimmerConfig,
    ) -> Result<Self, DimmerError<T::Error>> {
        check_frequency(config.frequency_hz)?;
        let group = allocator
            .claim(config.generator_pin, config.sync_pin)
            .inspect_err(|error| warn!("[Dimmer.create] {}", error))?;
        info!(
            "[Dimmer.create] generator {} sync {} -> group {}",
            config.generator_pin, config.sync_pin, group
        );
        Self::bind(timebase, config, group)
    }

    /// Program the time-base for resources that are already reserved
    pub(crate) fn bind(
        mut timebase: T,
        config: DimmerConfig,
        group: GroupId,
    ) -> Result<Self, DimmerError<T::Error>> {
        check_frequency(config.frequency_hz)?;
        let (timer, generator) = program(&mut timebase, &config, group)
            .inspect_err(|error| warn!("[Dimmer.create] hardware fault: {:?}", error))
            .map_err(DimmerError::HardwareFault)?;
        info!("[Dimmer.create] dimmer created at {} Hz", config.frequency_hz);

        Ok(Self {
            timebase,
            timer: Some(timer),
            generator: Some(generator),
            config,
            group,
            duty: 0,
            state: DimmerState::Configured,
        })
    }

    /// Release the forced level so the waveform reaches the output
    ///
    /// The output locks onto the zero crossing at the next sync edge.
    pub fn start(&mut self) -> Result<(), DimmerError<T::Error>> {
        if self.state == DimmerState::Running {
            return Ok(());
        }
        let (timebase, _, generator) = self.hardware()?;
        timebase
            .force_level(generator, OutputLevel::Released)
            .map_err(DimmerError::HardwareFault)?;
        self.state = DimmerState::Running;
        info!("[Dimmer.start] generator {}", self.config.generator_pin);
        Ok(())
    }

    /// Force the output low immediately
    pub fn stop(&mut self) -> Result<(), DimmerError<T::Error>> {
        let (timebase, _, generator) = self.hardware()?;
        timebase
            .force_level(generator, OutputLevel::Low)
            .map_err(DimmerError::HardwareFault)?;
        self.state = DimmerState::Stopped;
        info!("[Dimmer.stop] generator {}", self.config.generator_pin);
        Ok(())
    }

    /// Force the output low and tear down the timer binding
    ///
    /// The generator pin and the sync group stay reserved in the allocator.
    pub fn delete(&mut self) -> Result<(), DimmerError<T::Error>> {
        if self.state == DimmerState::Released {
            return Ok(());
        }
        let (timebase, timer, generator) = self.hardware()?;
        timebase
            .force_level(generator, OutputLevel::Low)
            .map_err(DimmerError::HardwareFault)?;
        timebase.disable(timer).map_err(DimmerError::HardwareFault)?;
        self.timer = None;
        self.generator = None;
        self.state = DimmerState::Released;
        info!("[Dimmer.delete] generator {}", self.config.generator_pin);
        Ok(())
    }

    /// Set the conduction interval in ticks, saturating at [`DUTY_MAX`]
    ///
    /// Takes effect at the next zero crossing.
    pub fn set_duty(&mut self, duty: u16) -> Result<(), DimmerError<T::Error>> {
        let duty = clamp_duty(duty);
        let compare = self.config.polarity.compare_value(duty);
        let (timebase, timer, _) = self.hardware()?;
        timebase
            .set_compare(timer, compare)
            .map_err(DimmerError::HardwareFault)?;
        self.duty = duty;
        Ok(())
    }

    /// Set the fraction of full power (0.0-1.0) delivered to the load
    pub fn set_power(&mut self, power: f32) -> Result<(), DimmerError<T::Error>> {
        self.set_duty(power_to_duty(power))
    }

    /// Fraction of full power at the current duty
    pub fn power(&self) -> f32 {
        duty_to_power(self.duty)
    }

    /// Reprogram the counter clock for a new nominal line frequency
    pub fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), DimmerError<T::Error>> {
        check_frequency(frequency_hz)?;
        let (timebase, timer, _) = self.hardware()?;
        timebase
            .set_resolution(timer, resolution_hz(frequency_hz))
            .map_err(DimmerError::HardwareFault)?;
        self.config.frequency_hz = frequency_hz;
        info!("[Dimmer.set_frequency] {} Hz", frequency_hz);
        Ok(())
    }

    pub const fn duty(&self) -> u16 {
        self.duty
    }

    pub const fn state(&self) -> DimmerState {
        self.state
    }

    pub const fn group(&self) -> GroupId {
        self.group
    }

    pub const fn generator_pin(&self) -> Pin {
        self.config.generator_pin
    }

    pub const fn sync_pin(&self) -> Pin {
        self.config.sync_pin
    }

    pub const fn frequency_hz(&self) -> u32 {
        self.config.frequency_hz
    }

    pub const fn polarity(&self) -> Polarity {
        self.config.polarity
    }

    /// Time the load conducts per half-cycle
    pub const fn conduction_time(&self) -> Duration {
        conduction_time(self.duty, self.config.frequency_hz)
    }

    /// Length of one half-cycle at the nominal frequency
    pub const fn half_cycle(&self) -> Duration {
        half_cycle(self.config.frequency_hz)
    }

    fn hardware(&mut self) -> Result<Hardware<'_, T>, DimmerError<T::Error>> {
        match (&mut self.timer, &mut self.generator) {
            (Some(timer), Some(generator)) => Ok((&mut self.timebase, timer, generator)),
            _ => Err(DimmerError::Released),
        }
    }
}

pub(crate) fn check_frequency<E>(frequency_hz: u32) -> Result<(), DimmerError<E>> {
    if frequency_hz == 0 || frequency_hz > MAX_FREQUENCY_HZ {
        return Err(DimmerError::InvalidFrequency(frequency_hz));
    }
    Ok(())
}

/// Allocate the timer, wire the generator and arm the phase reset
fn program<T: Timebase>(
    timebase: &mut T,
    config: &DimmerConfig,
    group: GroupId,
) -> Result<(T::Timer, T::Generator), T::Error> {
    let mut timer = timebase.allocate_timer(&TimerConfig {
        group,
        resolution_hz: resolution_hz(config.frequency_hz),
        period_ticks: DUTY_MAX,
    })?;
    timebase.set_compare(&mut timer, config.polarity.compare_value(0))?;

    let mut generator = timebase.bind_output(&mut timer, config.generator_pin, config.polarity)?;
    timebase.force_level(&mut generator, OutputLevel::Low)?;

    timebase.bind_sync_source(&mut timer, group, config.sync_pin)?;
    timebase.enable(&mut timer)?;

    Ok((timer, generator))
}
