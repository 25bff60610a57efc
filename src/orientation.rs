//! The four display orientations and the register settings behind each.
//!
//! This is a lookup table rather than a computed rotation: the panel's native scan order is
//! fixed and there is one inversion bit per physical axis, so each orientation is a specific
//! combination of wiring-dependent bits that has to be reproduced exactly.

use core::convert::TryFrom;

use crate::command::{AddressMode, AxisExchange, ColorOrder, ColumnOrder, RowOrder};
use crate::config::PanelGeometry;
use crate::error::InvalidOrientation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Portrait, the panel's native orientation.
    Deg0,
    /// Landscape.
    Deg90,
    /// Portrait, upside down.
    Deg180,
    /// Landscape, upside down.
    Deg270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Deg0,
        Orientation::Deg90,
        Orientation::Deg180,
        Orientation::Deg270,
    ];

    pub fn from_degrees(degrees: u16) -> Result<Self, InvalidOrientation> {
        match degrees {
            0 => Ok(Orientation::Deg0),
            90 => Ok(Orientation::Deg90),
            180 => Ok(Orientation::Deg180),
            270 => Ok(Orientation::Deg270),
            _ => Err(InvalidOrientation(degrees)),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }

    /// Whether logical x runs along the panel's tall side.
    pub fn swaps_axes(self) -> bool {
        match self {
            Orientation::Deg0 | Orientation::Deg180 => false,
            Orientation::Deg90 | Orientation::Deg270 => true,
        }
    }
}

impl TryFrom<u16> for Orientation {
    type Error = InvalidOrientation;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Orientation::from_degrees(degrees)
    }
}

/// Everything derived from an orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrientationParams {
    /// Value for the memory data access control register.
    pub address_mode: AddressMode,
    /// Logical width seen by the renderer.
    pub width: u16,
    /// Logical height seen by the renderer.
    pub height: u16,
    pub gap_x: u16,
    pub gap_y: u16,
}

/// Resolve the register value, logical size and gap offsets for `orientation` on a panel of
/// the given geometry.
pub fn resolve(orientation: Orientation, geometry: &PanelGeometry) -> OrientationParams {
    use self::AxisExchange::*;
    use self::ColumnOrder::*;
    use self::RowOrder::*;

    let (row_order, column_order, axis_exchange) = match orientation {
        Orientation::Deg0 => (TopToBottom, LeftToRight, Normal),
        Orientation::Deg90 => (TopToBottom, RightToLeft, Exchanged),
        Orientation::Deg180 => (BottomToTop, RightToLeft, Normal),
        Orientation::Deg270 => (BottomToTop, LeftToRight, Exchanged),
    };
    let address_mode = AddressMode::new(row_order, column_order, axis_exchange, ColorOrder::Bgr);

    let PanelGeometry { width, height, gap } = *geometry;
    if orientation.swaps_axes() {
        OrientationParams {
            address_mode,
            width: height,
            height: width,
            gap_x: 0,
            gap_y: gap,
        }
    } else {
        OrientationParams {
            address_mode,
            width,
            height,
            gap_x: gap,
            gap_y: 0,
        }
    }
}
