//! A display handle that can be shared between threads.
//!
//! Every operation holds one lock for its whole duration, so the window of one draw can never be
//! followed by the payload of another, and an orientation change never lands between a window
//! and its payload.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;

use crate::display::window::LogicalRect;
use crate::display::Display;
use crate::error::Error;
use crate::flush::FlushReady;
use crate::interface::DisplayInterface;
use crate::orientation::Orientation;

pub struct SharedDisplay<DI>
where
    DI: DisplayInterface,
{
    inner: Arc<Mutex<Display<DI>>>,
}

impl<DI> Clone for SharedDisplay<DI>
where
    DI: DisplayInterface,
{
    fn clone(&self) -> Self {
        SharedDisplay {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<DI> SharedDisplay<DI>
where
    DI: DisplayInterface,
{
    pub fn new(display: Display<DI>) -> Self {
        SharedDisplay {
            inner: Arc::new(Mutex::new(display)),
        }
    }

    /// Exclusive access to the display for a sequence of operations.
    ///
    /// A thread that panicked while holding the lock has already terminated any color burst it
    /// had open, as regions end theirs when dropped, so a poisoned lock is taken over.
    pub fn lock(&self) -> MutexGuard<'_, Display<DI>> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("Display lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn set_orientation(&self, orientation: Orientation) -> Result<(), Error<DI::Error>> {
        self.lock().set_orientation(orientation)
    }

    pub fn set_orientation_degrees(&self, degrees: u16) -> Result<(), Error<DI::Error>> {
        self.lock().set_orientation_degrees(degrees)
    }

    pub fn on_flush<R>(&self, rect: LogicalRect, pixels: &[u8], ready: &mut R)
    where
        R: FlushReady + ?Sized,
    {
        self.lock().on_flush(rect, pixels, ready)
    }

    /// Current logical `(width, height)`.
    pub fn size(&self) -> (u16, u16) {
        self.lock().size()
    }

    pub fn orientation(&self) -> Orientation {
        self.lock().orientation()
    }
}
