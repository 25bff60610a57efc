//! Static configuration of a panel: its geometry and the settings the driver applies when it
//! brings the panel up.

use crate::init::{InitCommand, ST7789V_170X320};
use crate::orientation::Orientation;

/// Physical dimensions of a panel, fixed by the module. `width` is always the narrow side and
/// `height` the tall side, whatever the orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelGeometry {
    pub width: u16,
    pub height: u16,
    /// Offset of the visible area inside controller RAM along the narrow axis. Many panels
    /// narrower than the controller's 240 columns are centered in RAM, e.g. a 170 pixel panel
    /// starts at column 35.
    pub gap: u16,
}

impl PanelGeometry {
    /// The 1.9" 170x320 IPS panel of the LilyGO T-Display-S3.
    pub const T_DISPLAY_S3: PanelGeometry = PanelGeometry::new(170, 320, 35);

    pub const fn new(width: u16, height: u16, gap: u16) -> Self {
        PanelGeometry { width, height, gap }
    }

    /// Size in bytes of one full frame at 16 bits per pixel.
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 2
    }
}

/// A configuration for the display. Builder methods offer a declarative way to override any of
/// the defaults, which match the T-Display-S3 board.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) geometry: PanelGeometry,
    pub(crate) logical_offset: (i32, i32),
    pub(crate) initial_orientation: Orientation,
    pub(crate) init_sequence: &'static [InitCommand],
    pub(crate) clear_color: u16,
    pub(crate) max_transfer_bytes: usize,
}

impl Config {
    /// Create a new configuration for a panel of the given geometry. The transfer budget starts
    /// out as one full frame.
    pub fn new(geometry: PanelGeometry) -> Self {
        Config {
            geometry,
            logical_offset: (0, 0),
            initial_orientation: Orientation::Deg90,
            init_sequence: ST7789V_170X320,
            clear_color: 0x0000,
            max_transfer_bytes: geometry.frame_bytes(),
        }
    }

    /// Extend this `Config` with a constant bias added to every edge of every logical draw
    /// rectangle before clamping.
    pub fn logical_offset(self, x: i32, y: i32) -> Self {
        Self {
            logical_offset: (x, y),
            ..self
        }
    }

    /// Extend this `Config` to apply a different orientation at the end of `Display::init`.
    pub fn initial_orientation(self, orientation: Orientation) -> Self {
        Self {
            initial_orientation: orientation,
            ..self
        }
    }

    /// Extend this `Config` to bootstrap the panel with a different vendor register table.
    pub fn init_sequence(self, table: &'static [InitCommand]) -> Self {
        Self {
            init_sequence: table,
            ..self
        }
    }

    /// Extend this `Config` with the RGB565 color used to wipe the panel after an orientation
    /// change.
    pub fn clear_color(self, color: u16) -> Self {
        Self {
            clear_color: color,
            ..self
        }
    }

    /// Extend this `Config` with the largest single pixel transfer the bus accepts. Full-surface
    /// clears need a buffer of this size at most.
    pub fn max_transfer_bytes(self, bytes: usize) -> Self {
        Self {
            max_transfer_bytes: bytes,
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(PanelGeometry::T_DISPLAY_S3)
    }
}
