//! The ST7789V commands used to address the panel, and the opcodes of the bring-up table.
//!
//! Note 1: The ST7789V display RAM is 240 columns by 320 rows. The memory data access control
//! register (`SetAddressMode`) decides how column and row addresses written with
//! `SetColumnAddress`/`SetRowAddress` map onto that RAM, so the meaning of "column" and "row"
//! below is always the controller's native one, independent of how the panel is rotated.

use crate::interface::DisplayInterface;

pub mod consts {
    //! Bit-exact opcodes used by the bring-up table and the addressing engine.

    pub const SLPOUT: u8 = 0x11;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const TEON: u8 = 0x35;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;

    /// COLMOD value selecting 16 bits/pixel RGB565 on both the RGB and control interfaces.
    pub const COLMOD_RGB565: u8 = 0x55;
}

use self::consts::*;

/// Page (row) address order, the MY bit of `SetAddressMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowOrder {
    TopToBottom,
    BottomToTop,
}

/// Column address order, the MX bit of `SetAddressMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnOrder {
    LeftToRight,
    RightToLeft,
}

/// Page/column exchange, the MV bit of `SetAddressMode`. When exchanged, column addresses
/// walk the RAM's row axis and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisExchange {
    Normal,
    Exchanged,
}

/// Order of the color channels in the panel's subpixel wiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

/// The value of the memory data access control (mirror/scan) register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressMode {
    pub row_order: RowOrder,
    pub column_order: ColumnOrder,
    pub axis_exchange: AxisExchange,
    pub color_order: ColorOrder,
}

impl AddressMode {
    pub const fn new(
        row_order: RowOrder,
        column_order: ColumnOrder,
        axis_exchange: AxisExchange,
        color_order: ColorOrder,
    ) -> Self {
        AddressMode {
            row_order,
            column_order,
            axis_exchange,
            color_order,
        }
    }

    /// Register encoding. Vertical refresh order and latch order are always left at 0.
    pub fn bits(self) -> u8 {
        let my = match self.row_order {
            RowOrder::TopToBottom => 0x00,
            RowOrder::BottomToTop => 0x80,
        };
        let mx = match self.column_order {
            ColumnOrder::LeftToRight => 0x00,
            ColumnOrder::RightToLeft => 0x40,
        };
        let mv = match self.axis_exchange {
            AxisExchange::Normal => 0x00,
            AxisExchange::Exchanged => 0x20,
        };
        let bgr = match self.color_order {
            ColorOrder::Rgb => 0x00,
            ColorOrder::Bgr => 0x08,
        };
        my | mx | mv | bgr
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Set the column start and end address of the window written by `WriteMemoryStart`.
    /// Both ends are inclusive. (Note 1)
    SetColumnAddress(u16, u16),
    /// Set the row start and end address of the window written by `WriteMemoryStart`. Both
    /// ends are inclusive. (Note 1)
    SetRowAddress(u16, u16),
    /// Begin writing color data at the start of the current column/row window. Image data then
    /// goes through `DisplayInterface::send_pixels`.
    WriteMemoryStart,
    /// Set the memory data access control register: scan directions, axis exchange and color
    /// order.
    SetAddressMode(AddressMode),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        ($cmd, &$buf[..0])
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        ($cmd, &$buf[..1])
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr, $arg3:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        $buf[3] = $arg3;
        ($cmd, &$buf[..4])
    }};
}

/// Window parameters: big-endian 16-bit start followed by big-endian 16-bit end.
fn window_params(start: u16, end: u16) -> [u8; 4] {
    let [sh, sl] = start.to_be_bytes();
    let [eh, el] = end.to_be_bytes();
    [sh, sl, eh, el]
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), DI::Error>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 4];
        let (cmd, data) = match self {
            Command::SetColumnAddress(start, end) => {
                let [a, b, c, d] = window_params(start, end);
                ok_command!(arg_buf, CASET, [a, b, c, d])
            }
            Command::SetRowAddress(start, end) => {
                let [a, b, c, d] = window_params(start, end);
                ok_command!(arg_buf, RASET, [a, b, c, d])
            }
            Command::WriteMemoryStart => ok_command!(arg_buf, RAMWR, []),
            Command::SetAddressMode(mode) => ok_command!(arg_buf, MADCTL, [mode.bits()]),
        };
        iface.send_command(cmd, data)
    }
}
