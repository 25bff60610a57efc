//! Region abstraction for streaming pixels into an addressed window of the display.
//!
//! A region may have been requested partially or entirely off the panel. The window the panel
//! was addressed with only covers the visible part, so pixel data for the rest of the request
//! has to be dropped before it reaches the transport.

use itertools::iproduct;
use log::error;

use crate::display::window::LogicalRect;
use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// A handle to a window of the display with an open memory write. Pixels are drawn
/// left-to-right and top-to-bottom in logical coordinates; the address mode register takes care
/// of the physical scan order.
///
/// These are intended to be short-lived, and mutably borrow the display that issued them so
/// clashing writes are prevented. The color burst is terminated when the region is finished
/// or dropped, also after a failed write.
pub struct Region<'d, DI>
where
    DI: DisplayInterface,
{
    display: &'d mut Display<DI>,
    requested: LogicalRect,
    visible: LogicalRect,
}

impl<'d, DI> Region<'d, DI>
where
    DI: DisplayInterface,
{
    /// Only called by `Display::begin_draw`, after the window for `visible` has been sent.
    pub(super) fn new(
        display: &'d mut Display<DI>,
        requested: LogicalRect,
        visible: LogicalRect,
    ) -> Self {
        Self {
            display,
            requested,
            visible,
        }
    }

    /// The rectangle that was asked for, with the logical offset applied.
    pub fn requested(&self) -> LogicalRect {
        self.requested
    }

    /// The part of the request that lies on the panel, which is what the window covers.
    pub fn visible(&self) -> LogicalRect {
        self.visible
    }

    /// Whether part of the request lies off the panel.
    pub fn is_cropped(&self) -> bool {
        self.requested != self.visible
    }

    /// Stream raw RGB565 payload bytes as they are. The caller is responsible for matching the
    /// visible window.
    pub fn draw_raw(&mut self, buf: &[u8]) -> Result<(), Error<DI::Error>> {
        self.display.iface.send_pixels(buf).map_err(|e| {
            error!("Failed to stream {} pixel bytes", buf.len());
            Error::Transport(e)
        })
    }

    /// Draw RGB565 pixels into the visible window, sent big-endian. Drawing stops once the
    /// window has been filled or the iterator runs out.
    pub fn draw_pixels<I>(&mut self, iter: I) -> Result<(), Error<DI::Error>>
    where
        I: IntoIterator<Item = u16>,
    {
        // Paint the region using constant memory by alternately filling a chunk buffer from the
        // iterator and writing it out.
        let mut iter = iter.into_iter().take(self.visible.pixel_count());
        let mut buf = [0u8; 32];

        loop {
            let mut chunk_len = 0;
            for slot in buf.chunks_exact_mut(2) {
                match iter.next() {
                    Some(pixel) => {
                        slot.copy_from_slice(&pixel.to_be_bytes());
                        chunk_len += 2;
                    }
                    None => break,
                }
            }

            if chunk_len > 0 {
                self.draw_raw(&buf[..chunk_len])?;
            }

            // The inner loop exiting early means the window is full or the iterator exhausted.
            if chunk_len != buf.len() {
                return Ok(());
            }
        }
    }

    /// Draw pixels covering the whole requested rectangle. Only those which fall on the panel
    /// are transmitted.
    pub fn draw_overscanned<I>(&mut self, iter: I) -> Result<(), Error<DI::Error>>
    where
        I: IntoIterator<Item = u16>,
    {
        let requested = self.requested;
        let visible = self.visible;
        let coords = iproduct!(
            requested.y_start..=requested.y_end,
            requested.x_start..=requested.x_end
        );
        let only_visible = coords
            .zip(iter)
            .filter(|((y, x), _)| visible.contains(*x, *y))
            .map(|(_, pixel)| pixel);
        self.draw_pixels(only_visible)
    }

    /// Like `draw_overscanned`, for a buffer of two-byte pixels already in wire order.
    pub fn draw_overscanned_raw(&mut self, buf: &[u8]) -> Result<(), Error<DI::Error>> {
        self.draw_overscanned(
            buf.chunks_exact(2)
                .map(|pixel| u16::from_be_bytes([pixel[0], pixel[1]])),
        )
    }

    /// Terminate the color burst.
    pub fn finish(self) {}
}

impl<'d, DI> Drop for Region<'d, DI>
where
    DI: DisplayInterface,
{
    fn drop(&mut self) {
        self.display.end_draw();
    }
}
