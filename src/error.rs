//! Error taxonomy of the driver. None of these are retried here; retry policy, if any, belongs to
//! the transport or to the renderer re-issuing an unacknowledged flush.

use thiserror::Error;

/// An orientation value outside {0, 90, 180, 270} degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("invalid orientation: {0} (must be 0, 90, 180 or 270)")]
pub struct InvalidOrientation(pub u16);

/// Failure translating a logical rectangle into a physical address window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum WindowError {
    /// The rectangle's start edge lies after its end edge on at least one axis.
    #[error("rectangle edges out of order")]
    InvalidRect,
    /// The translated window left the panel. Orientation is only ever set through the
    /// orientation model, so this means the sequencer state is corrupt.
    #[error("invalid orientation state")]
    InvalidOrientationState,
}

#[derive(Debug, PartialEq, Error)]
pub enum Error<E> {
    #[error("invalid orientation: {0}")]
    InvalidOrientation(u16),
    #[error("invalid orientation state")]
    InvalidOrientationState,
    #[error("rectangle edges out of order")]
    InvalidRect,
    /// The underlying command or payload write failed. Driver state is left at its last known
    /// good value.
    #[error("command transport failed")]
    Transport(E),
    /// The transient pixel buffer could not be allocated.
    #[error("unable to allocate {bytes} byte pixel buffer")]
    OutOfMemory { bytes: usize },
}

impl<E> From<InvalidOrientation> for Error<E> {
    fn from(e: InvalidOrientation) -> Self {
        Error::InvalidOrientation(e.0)
    }
}

impl<E> From<WindowError> for Error<E> {
    fn from(e: WindowError) -> Self {
        match e {
            WindowError::InvalidRect => Error::InvalidRect,
            WindowError::InvalidOrientationState => Error::InvalidOrientationState,
        }
    }
}
