//! Data types shared by the controller, scheduler and facade.

use crate::error::Error;

/// Number of LED channels on the flash block.
pub const CHANNEL_COUNT: usize = 2;

/// LED channel.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Channel {
    Ch1,
    Ch2,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::Ch1, Channel::Ch2];

    /// Validate a raw channel index coming from a command.
    pub fn from_index<E>(index: i32) -> Result<Self, Error<E>> {
        match index {
            0 => Ok(Channel::Ch1),
            1 => Ok(Channel::Ch2),
            _ => Err(Error::InvalidChannel),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Channel::Ch1 => 0,
            Channel::Ch2 => 1,
        }
    }
}

impl core::fmt::Display for Channel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Channel::Ch1 => f.write_str("ch1"),
            Channel::Ch2 => f.write_str("ch2"),
        }
    }
}

/// What a channel is currently driving.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LedMode {
    #[default]
    Off,
    Torch,
    Flash,
}

/// Mutable per-channel record.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ChannelState {
    /// Last level written, `None` until the first `set_level`.
    pub level: Option<u8>,
    pub mode: LedMode,
    /// Auto-off duration applied on enable, 0 = none.
    pub timeout_ms: u32,
}
