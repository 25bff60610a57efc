//! Panel self-test. Five full-screen colors followed by colored strips along the four edges
//! make wrong color order, a wrong gap and a mirrored or truncated window visible at a glance.

use embedded_hal::blocking::delay::DelayMs;
use itertools::iproduct;
use log::{error, info};

use crate::display::window::LogicalRect;
use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;

pub const RED: u16 = 0xF800;
pub const GREEN: u16 = 0x07E0;
pub const BLUE: u16 = 0x001F;
pub const BLACK: u16 = 0x0000;
pub const WHITE: u16 = 0xFFFF;

/// The full-screen fills, in order.
pub const TEST_COLORS: [(u16, &str); 5] = [
    (RED, "Red"),
    (BLUE, "Blue"),
    (GREEN, "Green"),
    (BLACK, "Black"),
    (WHITE, "White"),
];

/// Width in pixels of each edge strip.
pub const STRIP_WIDTH: u16 = 30;

/// How long each screen of the test is shown when the caller has no preference.
pub const DEFAULT_HOLD_MS: u16 = 2000;

/// Color of pixel (`x`, `y`) of the edge-strip screen: red along the top, blue along the
/// bottom, green down the left and white down the right, over black. Top and bottom strips
/// take precedence in the corners.
pub fn strip_color(x: u16, y: u16, width: u16, height: u16) -> u16 {
    if y < STRIP_WIDTH {
        RED
    } else if y >= height.saturating_sub(STRIP_WIDTH) {
        BLUE
    } else if x < STRIP_WIDTH {
        GREEN
    } else if x >= width.saturating_sub(STRIP_WIDTH) {
        WHITE
    } else {
        BLACK
    }
}

/// Every pixel of the edge-strip screen for a `width` x `height` surface, row by row.
pub fn edge_strips(width: u16, height: u16) -> impl Iterator<Item = u16> {
    iproduct!(0..height, 0..width).map(move |(y, x)| strip_color(x, y, width, height))
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Run the self-test in the current orientation, holding each screen for `hold_ms`. A
    /// failed screen is logged and the test moves on; the first failure is returned at the end.
    pub fn run_color_test<D>(&mut self, delay: &mut D, hold_ms: u16) -> Result<(), Error<DI::Error>>
    where
        D: DelayMs<u16>,
    {
        info!("Starting color test...");
        let mut first_error = None;

        for &(color, name) in TEST_COLORS.iter() {
            match self.clear(color) {
                Ok(()) => info!("{} clear (0x{:04X}) done", name, color),
                Err(e) => {
                    error!("{} clear (0x{:04X}) failed: {}", name, color, e);
                    first_error.get_or_insert(e);
                }
            }
            delay.delay_ms(hold_ms);
        }

        info!("Testing edges with colored strips...");
        let (width, height) = self.size();
        let full = LogicalRect::new(0, width as i32 - 1, 0, height as i32 - 1);
        let drawn = self
            .begin_draw(full)
            .and_then(|mut region| region.draw_overscanned(edge_strips(width, height)));
        if let Err(e) = drawn {
            error!("Edge test draw failed: {}", e);
            first_error.get_or_insert(e);
        }
        delay.delay_ms(hold_ms);

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
