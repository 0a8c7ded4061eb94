//! Dimmer configuration.
//!
//! A [`DimmerConfig`] names the pins of one dimmer and carries the nominal
//! line frequency and output convention used to program its timer.

use crate::phase::Polarity;
use crate::timebase::Pin;

/// European mains frequency
pub const HZ_50: u32 = 50;

/// North American mains frequency
pub const HZ_60: u32 = 60;

/// Nominal line frequency used when none is given
pub const DEFAULT_FREQUENCY_HZ: u32 = HZ_50;

/// Configuration of a single dimmer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimmerConfig {
    /// Output pin switched by the compare event
    pub generator_pin: Pin,
    /// Zero-crossing detector input
    pub sync_pin: Pin,
    /// Nominal line frequency
    pub frequency_hz: u32,
    /// Generator output convention
    pub polarity: Polarity,
}

impl DimmerConfig {
    /// Configuration at [`DEFAULT_FREQUENCY_HZ`] with the triac firing convention
    pub const fn new(generator_pin: Pin, sync_pin: Pin) -> Self {
        Self {
            generator_pin,
            sync_pin,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            polarity: Polarity::ConductUntilZero,
        }
    }

    /// Set the nominal line frequency
    #[must_use]
    pub const fn with_frequency(mut self, frequency_hz: u32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    /// Set the generator output convention
    #[must_use]
    pub const fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }
}
