use core::fmt;

/// Acquisition errors.
///
/// Every variant is reported once, straight from the failing step. The
/// driver never retries and never substitutes an older sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The zero-length trigger write failed. No read was attempted.
    Write(E),
    /// The block read failed on the bus.
    Read(E),
    /// The block read returned fewer than four bytes. The transport's own
    /// status is dropped since a partial payload cannot be decoded.
    ShortRead { received: usize },
}

impl<E> Error<E> {
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Error::Write(_))
    }

    /// Bus errors during the read as well as short reads.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Error::Read(_) | Error::ShortRead { .. })
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Write(e) => write!(f, "trigger write failed: {:?}", e),
            Error::Read(e) => write!(f, "block read failed: {:?}", e),
            Error::ShortRead { received } => {
                write!(f, "I/O error: short read of {} of 4 bytes", received)
            }
        }
    }
}
