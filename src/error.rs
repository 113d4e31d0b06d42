//! Driver and session errors

use core::fmt;

/// Error type of the driver and the radio session
///
/// `E` is the error type of the [`crate::transport::Bus`] in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transport failed
    Bus(E),
    /// A polling loop ran out of its retry budget
    Unresponsive,
    /// A typed register could not be parsed from the bytes read
    Deserialization,
    /// Rejected configuration
    InvalidConfig,
    /// The command has no byte signature and cannot be sent
    InvalidCommand,
    /// The session is not in the mode the operation requires
    WrongMode,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Bus(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(err) => write!(f, "bus error: {:?}", err),
            Self::Unresponsive => write!(f, "device unresponsive"),
            Self::Deserialization => write!(f, "invalid register value"),
            Self::InvalidConfig => write!(f, "invalid configuration"),
            Self::InvalidCommand => write!(f, "command has no signature"),
            Self::WrongMode => write!(f, "radio is in the wrong mode"),
        }
    }
}
