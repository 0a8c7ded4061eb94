//! Hardware time-base abstraction.
//!
//! A time-base counts [`DUTY_MAX`](crate::phase::DUTY_MAX) ticks per
//! electrical half-cycle, resets its phase on every zero-crossing edge and
//! switches a generator pin on its zero and compare events. Board support
//! code implements [`Timebase`] on top of the actual PWM peripheral.

use crate::phase::Polarity;

/// GPIO number
pub type Pin = u8;

/// Index of a time-base group sharing one sync source
pub type GroupId = u8;

/// Level forced on a generator output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Output held low, load de-energized
    Low,
    /// Output held high
    High,
    /// Force removed, output follows the zero/compare events
    Released,
}

/// Timer programming parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Group the timer, its operator and its sync source belong to
    pub group: GroupId,
    /// Counter clock, chosen so that one period equals one half-cycle
    pub resolution_hz: u32,
    /// Ticks per period
    pub period_ticks: u16,
}

/// Abstract phase-locked PWM time-base
///
/// Implement this trait to support different hardware platforms.
/// Dimmers are generic over this trait and never touch registers directly.
pub trait Timebase {
    /// Handle of an allocated timer (with its comparator)
    type Timer;
    /// Handle of an output generator bound to a timer
    type Generator;
    /// Peripheral error
    type Error: core::fmt::Debug;

    /// Allocate a counting-up timer in the given group
    fn allocate_timer(&mut self, config: &TimerConfig) -> Result<Self::Timer, Self::Error>;

    /// Bind a generator pin to the timer
    ///
    /// The generator switches to `polarity.on_zero()` when the counter wraps
    /// and to `polarity.on_compare()` on the compare event.
    fn bind_output(
        &mut self,
        timer: &mut Self::Timer,
        pin: Pin,
        polarity: Polarity,
    ) -> Result<Self::Generator, Self::Error>;

    /// Program the compare value
    ///
    /// The value must be latched when the counter reaches zero, never
    /// mid-period.
    fn set_compare(&mut self, timer: &mut Self::Timer, ticks: u16) -> Result<(), Self::Error>;

    /// Change the counter clock
    fn set_resolution(
        &mut self,
        timer: &mut Self::Timer,
        resolution_hz: u32,
    ) -> Result<(), Self::Error>;

    /// Force the generator output to a level
    fn force_level(
        &mut self,
        generator: &mut Self::Generator,
        level: OutputLevel,
    ) -> Result<(), Self::Error>;

    /// Reset the timer phase to zero on every rising edge of `sync_pin`
    fn bind_sync_source(
        &mut self,
        timer: &mut Self::Timer,
        group: GroupId,
        sync_pin: Pin,
    ) -> Result<(), Self::Error>;

    /// Enable and start the timer
    fn enable(&mut self, timer: &mut Self::Timer) -> Result<(), Self::Error>;

    /// Stop and disable the timer
    fn disable(&mut self, timer: &mut Self::Timer) -> Result<(), Self::Error>;
}
