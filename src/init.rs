//! Panel bring-up: the vendor register table and the routine that plays it out.
//!
//! The table is opaque data. Its values come from the panel vendor and encode porch timings,
//! voltages and gamma curves, so they are kept byte for byte in their original order.

use embedded_hal::blocking::delay::DelayMs;
use log::debug;

use crate::command::consts::*;
use crate::interface::DisplayInterface;

/// Time the controller needs after a flagged command (sleep out, display on) before it accepts
/// the next one.
pub const POST_DELAY_MS: u16 = 120;

/// Bit 7 of a packed length byte requests a post-command delay.
const PACKED_DELAY_FLAG: u8 = 0x80;
/// A packed length byte of this value ends a vendor table.
const PACKED_END: u8 = 0xFF;

/// One register write of a bootstrap table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitCommand {
    pub opcode: u8,
    pub params: &'static [u8],
    /// Wait `POST_DELAY_MS` after sending.
    pub delay_after: bool,
}

impl InitCommand {
    pub const fn new(opcode: u8, params: &'static [u8]) -> Self {
        InitCommand {
            opcode,
            params,
            delay_after: false,
        }
    }

    pub const fn delayed(opcode: u8, params: &'static [u8]) -> Self {
        InitCommand {
            opcode,
            params,
            delay_after: true,
        }
    }

    /// Decode one record of a vendor table in the packed form, where the low 7 bits of `len`
    /// count the parameter bytes, bit 7 flags a post-command delay and `0xFF` terminates the
    /// table. Returns `None` at the terminator. `params` may be longer than the count; only the
    /// counted prefix is kept.
    pub fn decode_packed(opcode: u8, params: &'static [u8], len: u8) -> Option<Self> {
        if len == PACKED_END {
            return None;
        }
        let count = ((len & !PACKED_DELAY_FLAG) as usize).min(params.len());
        Some(InitCommand {
            opcode,
            params: &params[..count],
            delay_after: len & PACKED_DELAY_FLAG != 0,
        })
    }
}

const GAMMA: &[u8] = &[
    0xD0, 0x08, 0x11, 0x08, 0x09, 0x15, 0x31, 0x33, 0x48, 0x17, 0x14, 0x15, 0x31, 0x34,
];

/// Bring-up table for an ST7789V driving a 170x320 IPS panel over the 8-bit parallel bus.
#[rustfmt::skip]
pub const ST7789V_170X320: &[InitCommand] = &[
    InitCommand::delayed(SLPOUT, &[]),
    InitCommand::new(INVON, &[]),
    InitCommand::new(TEON, &[0x00]),                          // V-blank only
    InitCommand::new(COLMOD, &[COLMOD_RGB565]),
    InitCommand::new(0xB2, &[0x0C, 0x0C, 0x00, 0x33, 0x33]),  // porch setting
    InitCommand::new(0xB7, &[0x35]),                          // gate control
    InitCommand::new(0xBB, &[0x19]),                          // VCOM
    InitCommand::new(0xC0, &[0x2C]),                          // LCM control
    InitCommand::new(0xC2, &[0x01]),                          // VDV/VRH enable
    InitCommand::new(0xC3, &[0x12]),                          // VRH
    InitCommand::new(0xC4, &[0x20]),                          // VDV
    InitCommand::new(0xC6, &[0x0F]),                          // 60 Hz frame rate
    InitCommand::new(0xD0, &[0xA4, 0xA1]),                    // power control
    InitCommand::new(0xE0, GAMMA),                            // positive gamma
    InitCommand::new(0xE1, GAMMA),                            // negative gamma
    InitCommand::new(CASET, &[0x00, 0x00, 0x01, 0x3F]),       // columns 0-319
    InitCommand::new(RASET, &[0x00, 0x00, 0x00, 0xA9]),       // rows 0-169
    InitCommand::delayed(DISPON, &[]),
];

/// Send every record of `table` in order. The first transport failure aborts the bootstrap.
pub fn run<DI, D>(iface: &mut DI, table: &[InitCommand], delay: &mut D) -> Result<(), DI::Error>
where
    DI: DisplayInterface,
    D: DelayMs<u16>,
{
    for record in table {
        debug!(
            "Sending cmd 0x{:02X}, len={}",
            record.opcode,
            record.params.len()
        );
        iface.send_command(record.opcode, record.params)?;
        if record.delay_after {
            delay.delay_ms(POST_DELAY_MS);
        }
    }
    Ok(())
}
