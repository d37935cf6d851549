//! Driver errors

use ili9481_core::ConfigError;

/// Errors from streaming and panel operations
///
/// `E` is the transport's own error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// Invalid configuration or argument
    Config(ConfigError),
    /// A transfer did not complete in time; the panel must be re-initialized
    TransferTimeout,
    /// Streaming refused after an earlier timeout
    Faulted,
    /// Pixel data sent with no addressing window armed
    WindowNotArmed,
    /// Transport-specific failure
    Transport(E),
}

impl<E> From<ConfigError> for DriverError<E> {
    fn from(err: ConfigError) -> Self {
        DriverError::Config(err)
    }
}
