//! Translation of logical draw rectangles into the controller's native column/row windows.
//!
//! A logical rectangle is expressed in the renderer's coordinate system, which follows the
//! current orientation. The controller always addresses its RAM in physical columns and rows,
//! and the address mode register only decides the scan direction of the subsequent pixel
//! stream, so the window itself has to be rotated here.
//!
//! Clamping happens in logical space, against the orientation's logical bounds, before the
//! rectangle is mapped onto physical axes. Under 180 and 270 degrees this decides which physical
//! edge a partially off-panel rectangle gets truncated at.

use crate::config::PanelGeometry;
use crate::error::WindowError;
use crate::orientation::Orientation;

/// A rectangle in logical (renderer) pixel coordinates. All edges are inclusive. Coordinates
/// may be negative or exceed the panel, in which case drawing is cropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogicalRect {
    pub x_start: i32,
    pub x_end: i32,
    pub y_start: i32,
    pub y_end: i32,
}

impl LogicalRect {
    pub const fn new(x_start: i32, x_end: i32, y_start: i32, y_end: i32) -> Self {
        LogicalRect {
            x_start,
            x_end,
            y_start,
            y_end,
        }
    }

    /// Whether start does not exceed end on both axes.
    pub fn is_ordered(&self) -> bool {
        self.x_start <= self.x_end && self.y_start <= self.y_end
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_start && x <= self.x_end && y >= self.y_start && y <= self.y_end
    }

    pub fn width(&self) -> usize {
        (self.x_end as i64 - self.x_start as i64 + 1).max(0) as usize
    }

    pub fn height(&self) -> usize {
        (self.y_end as i64 - self.y_start as i64 + 1).max(0) as usize
    }

    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Shift all four edges by a constant bias.
    pub fn offset(self, (dx, dy): (i32, i32)) -> Self {
        LogicalRect {
            x_start: self.x_start.saturating_add(dx),
            x_end: self.x_end.saturating_add(dx),
            y_start: self.y_start.saturating_add(dy),
            y_end: self.y_end.saturating_add(dy),
        }
    }
}

/// An address window in the controller's native column/row space. Both ends are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalWindow {
    pub col_start: u16,
    pub col_end: u16,
    pub row_start: u16,
    pub row_end: u16,
}

/// Largest valid logical x and y for the orientation.
fn logical_max(orientation: Orientation, geometry: &PanelGeometry) -> (i32, i32) {
    let w = geometry.width as i32 - 1;
    let h = geometry.height as i32 - 1;
    if orientation.swaps_axes() {
        (h, w)
    } else {
        (w, h)
    }
}

/// Apply `offset` to `rect` and clamp every edge into the logical bounds of `orientation`.
///
/// A rectangle extending past the panel is truncated at the panel edge. One lying entirely off
/// the panel collapses onto the nearest edge line, which does not intersect the request, so a
/// cropped draw of it sends no pixels.
pub fn clip(
    rect: LogicalRect,
    orientation: Orientation,
    geometry: &PanelGeometry,
    offset: (i32, i32),
) -> Result<LogicalRect, WindowError> {
    if !rect.is_ordered() {
        return Err(WindowError::InvalidRect);
    }
    let rect = rect.offset(offset);
    let (max_x, max_y) = logical_max(orientation, geometry);
    Ok(LogicalRect {
        x_start: rect.x_start.max(0).min(max_x),
        x_end: rect.x_end.max(0).min(max_x),
        y_start: rect.y_start.max(0).min(max_y),
        y_end: rect.y_end.max(0).min(max_y),
    })
}

/// Map an already clipped rectangle onto physical columns and rows.
pub fn map(
    clipped: LogicalRect,
    orientation: Orientation,
    geometry: &PanelGeometry,
) -> Result<PhysicalWindow, WindowError> {
    let w = geometry.width as i32 - 1;
    let h = geometry.height as i32 - 1;
    let r = clipped;

    let (cols, rows) = match orientation {
        Orientation::Deg0 => ((r.x_start, r.x_end), (r.y_start, r.y_end)),
        Orientation::Deg90 => ((r.y_start, r.y_end), (r.x_start, r.x_end)),
        Orientation::Deg180 => ((w - r.x_end, w - r.x_start), (h - r.y_end, h - r.y_start)),
        Orientation::Deg270 => ((w - r.y_end, w - r.y_start), (h - r.x_end, h - r.x_start)),
    };

    let (col_start, col_end) = physical_range(cols, w)?;
    let (row_start, row_end) = physical_range(rows, h)?;
    Ok(PhysicalWindow {
        col_start,
        col_end,
        row_start,
        row_end,
    })
}

/// Clip `rect` and map it onto the physical window the controller should be addressed with.
pub fn translate(
    rect: LogicalRect,
    orientation: Orientation,
    geometry: &PanelGeometry,
    offset: (i32, i32),
) -> Result<PhysicalWindow, WindowError> {
    let clipped = clip(rect, orientation, geometry, offset)?;
    map(clipped, orientation, geometry)
}

fn physical_range((start, end): (i32, i32), max: i32) -> Result<(u16, u16), WindowError> {
    if start < 0 || end > max || start > end {
        return Err(WindowError::InvalidOrientationState);
    }
    Ok((start as u16, end as u16))
}
