//! Command surface of the flashlight device.
//!
//! Raw requests arrive as a command code plus a [`FlashArg`]; [`Command::decode`]
//! turns them into a typed [`Command`].

use crate::data_types::Channel;
use crate::error::Error;

/// In/out argument of a raw request. Query commands write their answer back
/// into `arg`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FlashArg {
    pub channel: i32,
    pub arg: i32,
}

/// Command numbers used by the dispatch layer.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CommandCode {
    SetTimeoutMs = 1,
    SetDuty = 2,
    SetOnOff = 3,
    GetDutyNumber = 4,
    GetMaxTorchDuty = 5,
    GetDutyCurrent = 6,
    GetHwTimeout = 7,
}

impl TryFrom<u32> for CommandCode {
    type Error = ();

    fn try_from(code: u32) -> Result<Self, ()> {
        Ok(match code {
            1 => CommandCode::SetTimeoutMs,
            2 => CommandCode::SetDuty,
            3 => CommandCode::SetOnOff,
            4 => CommandCode::GetDutyNumber,
            5 => CommandCode::GetMaxTorchDuty,
            6 => CommandCode::GetDutyCurrent,
            7 => CommandCode::GetHwTimeout,
            _ => return Err(()),
        })
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    SetTimeout { channel: Channel, ms: u32 },
    SetLevel { channel: Channel, level: i32 },
    /// Arms the configured timeout then enables, or disables and cancels.
    SetOnOff { channel: Channel, on: bool },
    GetLevelCount,
    GetMaxTorchLevel,
    GetCurrentForLevel(i32),
    GetHardwareTimeoutMs,
}

impl Command {
    /// Decode a raw request. The channel is validated before the code, for
    /// every command.
    pub fn decode<E>(code: u32, arg: &FlashArg) -> Result<Self, Error<E>> {
        let channel = Channel::from_index(arg.channel)?;
        let code = CommandCode::try_from(code).map_err(|_| Error::NotSupported)?;
        Ok(match code {
            CommandCode::SetTimeoutMs => Command::SetTimeout {
                channel,
                ms: u32::try_from(arg.arg).unwrap_or(0),
            },
            CommandCode::SetDuty => Command::SetLevel {
                channel,
                level: arg.arg,
            },
            CommandCode::SetOnOff => Command::SetOnOff {
                channel,
                on: arg.arg == 1,
            },
            CommandCode::GetDutyNumber => Command::GetLevelCount,
            CommandCode::GetMaxTorchDuty => Command::GetMaxTorchLevel,
            CommandCode::GetDutyCurrent => Command::GetCurrentForLevel(arg.arg),
            CommandCode::GetHwTimeout => Command::GetHardwareTimeoutMs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(code: u32, channel: i32, arg: i32) -> Result<Command, Error<()>> {
        Command::decode(code, &FlashArg { channel, arg })
    }

    #[test]
    fn channel_is_checked_before_code() {
        assert_eq!(decode(99, 2, 0), Err(Error::InvalidChannel));
        assert_eq!(decode(4, -1, 0), Err(Error::InvalidChannel));
        assert_eq!(decode(99, 0, 0), Err(Error::NotSupported));
    }

    #[test]
    fn on_off_only_accepts_one_as_on() {
        assert_eq!(
            decode(3, 1, 1),
            Ok(Command::SetOnOff { channel: Channel::Ch2, on: true })
        );
        assert_eq!(
            decode(3, 1, 2),
            Ok(Command::SetOnOff { channel: Channel::Ch2, on: false })
        );
    }

    #[test]
    fn negative_timeout_decodes_as_none() {
        assert_eq!(
            decode(1, 0, -50),
            Ok(Command::SetTimeout { channel: Channel::Ch1, ms: 0 })
        );
    }
}
