//! Phase-control math.
//!
//! Converts between the fraction of full power delivered to a resistive load
//! and the conduction interval, in ticks, within one half-cycle.

use core::f32::consts::PI;

use embassy_time::Duration;

use crate::timebase::OutputLevel;

/// Ticks per electrical half-cycle
pub const DUTY_MAX: u16 = 1000;

/// Saturate a duty value to [`DUTY_MAX`]
#[inline]
pub const fn clamp_duty(duty: u16) -> u16 {
    if duty > DUTY_MAX { DUTY_MAX } else { duty }
}

/// Convert a power fraction (0.0-1.0) to a duty in ticks
///
/// `d = round(1000 * acos(1 - 2p) / pi)`, saturated at both ends so that
/// `acos` never sees an argument outside its domain. NaN maps to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn power_to_duty(power: f32) -> u16 {
    if power.is_nan() || power <= 0.0 {
        return 0;
    }
    if power >= 1.0 {
        return DUTY_MAX;
    }
    let angle = libm::acosf(1.0 - 2.0 * power);
    let duty = libm::roundf(f32::from(DUTY_MAX) * angle / PI);
    clamp_duty(duty as u16)
}

/// Convert a duty in ticks back to the power fraction it delivers
pub fn duty_to_power(duty: u16) -> f32 {
    let duty = f32::from(clamp_duty(duty));
    0.5 * (1.0 - libm::cosf(PI * duty / f32::from(DUTY_MAX)))
}

/// Highest line frequency whose counter clock fits in a `u32`
#[allow(clippy::cast_lossless)]
pub const MAX_FREQUENCY_HZ: u32 = u32::MAX / (2 * DUTY_MAX as u32);

/// Counter clock giving [`DUTY_MAX`] ticks per half-cycle
///
/// Saturates at `u32::MAX` above [`MAX_FREQUENCY_HZ`].
#[allow(clippy::cast_lossless)]
pub const fn resolution_hz(frequency_hz: u32) -> u32 {
    frequency_hz.saturating_mul(2 * DUTY_MAX as u32)
}

/// Length of one half-cycle
///
/// A zero frequency has no half-cycle and yields [`Duration::MAX`].
#[allow(clippy::cast_lossless)]
pub const fn half_cycle(frequency_hz: u32) -> Duration {
    match 500_000u64.checked_div(frequency_hz as u64) {
        Some(micros) => Duration::from_micros(micros),
        None => Duration::MAX,
    }
}

/// Time the load conducts per half-cycle at the given duty
///
/// Yields [`Duration::MAX`] for a zero frequency.
#[allow(clippy::cast_lossless)]
pub const fn conduction_time(duty: u16, frequency_hz: u32) -> Duration {
    match (clamp_duty(duty) as u64 * 500).checked_div(frequency_hz as u64) {
        Some(micros) => Duration::from_micros(micros),
        None => Duration::MAX,
    }
}

/// Generator output convention
///
/// The stored duty is always the conduction interval. The polarity decides
/// where in the half-cycle that interval sits and therefore what gets
/// written to the compare register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// High from the zero crossing until compare, low afterwards
    ConductFromZero,
    /// Low from the zero crossing until compare, high until the next
    /// zero crossing (triac firing delay)
    #[default]
    ConductUntilZero,
}

impl Polarity {
    /// Compare register value for a duty
    pub const fn compare_value(self, duty: u16) -> u16 {
        let duty = clamp_duty(duty);
        match self {
            Self::ConductFromZero => duty,
            Self::ConductUntilZero => DUTY_MAX - duty,
        }
    }

    /// Duty represented by a compare register value
    pub const fn duty_from_compare(self, compare: u16) -> u16 {
        // The mapping is an involution in both conventions
        self.compare_value(compare)
    }

    /// Level the generator switches to when the counter wraps
    pub const fn on_zero(self) -> OutputLevel {
        match self {
            Self::ConductFromZero => OutputLevel::High,
            Self::ConductUntilZero => OutputLevel::Low,
        }
    }

    /// Level the generator switches to on the compare event
    pub const fn on_compare(self) -> OutputLevel {
        match self {
            Self::ConductFromZero => OutputLevel::Low,
            Self::ConductUntilZero => OutputLevel::High,
        }
    }
}
