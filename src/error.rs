//! Error definitions for the flashlight driver.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Eq, PartialEq)]
pub enum Error<PortError> {
    /// Underlying register transaction failed.
    Io(PortError),
    /// Channel index outside the two LED channels.
    InvalidChannel,
    /// Unknown command code.
    NotSupported,
    /// Deferred-work context could not be started or reclaimed.
    Unavailable,
}

impl<PortError> Error<PortError> {
    /// Negative status code reported across the command boundary.
    pub fn errno(&self) -> i32 {
        match self {
            Error::Io(_) => -5,
            Error::InvalidChannel => -22,
            Error::NotSupported => -25,
            Error::Unavailable => -16,
        }
    }
}

impl<PortError: core::fmt::Debug> core::fmt::Display for Error<PortError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "register I/O error: {:?}", e),
            Error::InvalidChannel => write!(f, "bad channel"),
            Error::NotSupported => write!(f, "unsupported operation"),
            Error::Unavailable => write!(f, "deferred-work context unavailable"),
        }
    }
}

#[cfg(feature = "std")]
impl<PortError: core::fmt::Debug> std::error::Error for Error<PortError> {}
