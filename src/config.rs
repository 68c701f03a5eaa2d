//! Driver configuration.

use crate::data_types::{CHANNEL_COUNT, Channel};
use crate::registers::INIT_SEQUENCE;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Config {
    /// Auto-off duration per channel applied on enable, 0 = none.
    pub timeout_ms: [u32; CHANNEL_COUNT],
    /// Register writes performed by `chip_init`, in order.
    pub init_sequence: &'static [(u8, u8)],
}

impl Config {
    /// Per-channel timeout the board support code installs at probe.
    pub const DEFAULT_PROBE_TIMEOUT_MS: u32 = 100;

    pub fn with_timeout_ms(mut self, channel: Channel, timeout_ms: u32) -> Self {
        self.timeout_ms[channel.index()] = timeout_ms;
        self
    }

    pub fn with_init_sequence(mut self, init_sequence: &'static [(u8, u8)]) -> Self {
        self.init_sequence = init_sequence;
        self
    }

    /// Configuration matching board bring-up: every channel auto-offs after
    /// [`Config::DEFAULT_PROBE_TIMEOUT_MS`].
    pub fn probe_defaults() -> Self {
        Self {
            timeout_ms: [Self::DEFAULT_PROBE_TIMEOUT_MS; CHANNEL_COUNT],
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: [0; CHANNEL_COUNT],
            init_sequence: &INIT_SEQUENCE,
        }
    }
}
