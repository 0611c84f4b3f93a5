use core::fmt;

/// Failures of the non-blocking hand-off paths.
///
/// The control path itself has no error cases; these only come back from
/// `try_*` style calls where the caller chose not to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A bounded link had no room for the message.
    QueueFull,
    /// An interrupt-side event arrived while its queue was saturated.
    EventDropped,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QueueFull => f.write_str("queue full"),
            Self::EventDropped => f.write_str("event dropped"),
        }
    }
}
