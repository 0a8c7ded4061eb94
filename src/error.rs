//! Error types

use core::fmt;

use crate::timebase::Pin;

/// Resource reservation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Generator pin is already bound to another dimmer
    PinInUse(Pin),
    /// Every time-base group is tied to a different sync pin
    NoGroupAvailable,
    /// Pin number outside the generator registry
    InvalidPin(Pin),
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinInUse(pin) => write!(f, "generator pin {} already in use", pin),
            Self::NoGroupAvailable => write!(f, "no time-base group available"),
            Self::InvalidPin(pin) => write!(f, "invalid pin {}", pin),
        }
    }
}

/// Dimmer operation errors
///
/// `E` is the error type of the underlying [`Timebase`](crate::Timebase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerError<E> {
    /// Generator pin is already bound to another dimmer
    PinInUse(Pin),
    /// Every time-base group is tied to a different sync pin
    NoGroupAvailable,
    /// Pin number outside the generator registry
    InvalidPin(Pin),
    /// Line frequency of zero
    InvalidFrequency(u32),
    /// Dimmer was deleted
    Released,
    /// Programming the time-base failed
    HardwareFault(E),
}

impl<E> From<AllocError> for DimmerError<E> {
    fn from(error: AllocError) -> Self {
        match error {
            AllocError::PinInUse(pin) => Self::PinInUse(pin),
            AllocError::NoGroupAvailable => Self::NoGroupAvailable,
            AllocError::InvalidPin(pin) => Self::InvalidPin(pin),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for DimmerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinInUse(pin) => write!(f, "generator pin {} already in use", pin),
            Self::NoGroupAvailable => write!(f, "no time-base group available"),
            Self::InvalidPin(pin) => write!(f, "invalid pin {}", pin),
            Self::InvalidFrequency(hz) => write!(f, "invalid line frequency {} Hz", hz),
            Self::Released => write!(f, "dimmer released"),
            Self::HardwareFault(error) => write!(f, "hardware fault: {:?}", error),
        }
    }
}

/// Error returned when trying to send to a closed channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError<T>(pub T);

/// Error returned when trying to receive from an empty channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;
