//! The main API to the display driver. A `Display` owns the transport and the current
//! orientation, and sequences the commands that address the panel: the bring-up table, the
//! orientation switch, and the window/stream/terminate cycle behind every draw.

pub mod region;
pub mod window;

use alloc::vec::Vec;
use embedded_hal::blocking::delay::DelayMs;
use log::{debug, error, info, trace};

use crate::command::Command;
use crate::config::{Config, PanelGeometry};
use crate::display::region::Region;
use crate::display::window::LogicalRect;
use crate::error::Error;
use crate::init;
use crate::interface::DisplayInterface;
use crate::orientation::{self, Orientation, OrientationParams};

/// The orientation currently applied to the panel and everything derived from it. Only
/// replaced once the panel has accepted both the address mode and the gap update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SequencerState {
    orientation: Orientation,
    params: OrientationParams,
}

/// A driver for an ST7789V display.
pub struct Display<DI>
where
    DI: DisplayInterface,
{
    iface: DI,
    config: Config,
    state: SequencerState,
    /// A memory write has been started and not yet terminated.
    drawing: bool,
    /// The address mode in `state` has been written to the panel at least once.
    ready: bool,
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Construct a new display driver for a panel connected to `iface`. Nothing is sent until
    /// `init`.
    pub fn new(iface: DI, config: Config) -> Self {
        let orientation = config.initial_orientation;
        Display {
            iface,
            state: SequencerState {
                orientation,
                params: orientation::resolve(orientation, &config.geometry),
            },
            config,
            drawing: false,
            ready: false,
        }
    }

    /// Bring the panel up: play the configured bootstrap table, then apply the initial
    /// orientation, which also clears the screen.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), Error<DI::Error>>
    where
        D: DelayMs<u16>,
    {
        info!(
            "Initializing panel {}x{} ({} bootstrap commands)",
            self.config.geometry.width,
            self.config.geometry.height,
            self.config.init_sequence.len()
        );
        init::run(&mut self.iface, self.config.init_sequence, delay).map_err(|e| {
            error!("Panel bootstrap failed");
            Error::Transport(e)
        })?;
        self.set_orientation(self.config.initial_orientation)
    }

    /// Rotate the display. The address mode and the gap offsets are sent first; only when both
    /// succeed is the new orientation committed, after which the screen is cleared to wipe the
    /// previous layout's content.
    ///
    /// If the gap update fails after the address mode was accepted, the previous address mode
    /// is sent again so the panel keeps scanning the way the committed state says it does.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), Error<DI::Error>> {
        let params = orientation::resolve(orientation, &self.config.geometry);

        let mode = params.address_mode;
        Command::SetAddressMode(mode)
            .send(&mut self.iface)
            .map_err(|e| {
                error!("Failed to set address mode 0x{:02X}", mode.bits());
                Error::Transport(e)
            })?;

        if let Err(e) = self.iface.set_gap(params.gap_x, params.gap_y) {
            error!(
                "Failed to set gap (x_gap={}, y_gap={})",
                params.gap_x, params.gap_y
            );
            if self.ready {
                let previous = self.state.params.address_mode;
                if Command::SetAddressMode(previous)
                    .send(&mut self.iface)
                    .is_err()
                {
                    error!("Failed to restore address mode 0x{:02X}", previous.bits());
                }
            }
            return Err(Error::Transport(e));
        }
        info!(
            "Set display gap: x_gap={}, y_gap={}",
            params.gap_x, params.gap_y
        );

        self.state = SequencerState {
            orientation,
            params,
        };
        self.ready = true;
        info!(
            "Orientation set to {} degrees, address mode 0x{:02X}, {}x{}",
            orientation.degrees(),
            mode.bits(),
            params.width,
            params.height
        );

        self.clear(self.config.clear_color)
    }

    /// Like `set_orientation`, for a rotation given in degrees. Anything other than 0, 90, 180
    /// or 270 is rejected before a command is sent.
    pub fn set_orientation_degrees(&mut self, degrees: u16) -> Result<(), Error<DI::Error>> {
        let orientation = Orientation::from_degrees(degrees).map_err(|e| {
            error!("Invalid orientation: {}", degrees);
            e
        })?;
        self.set_orientation(orientation)
    }

    /// Address the panel window covering `rect` and start a memory write.
    ///
    /// The rectangle is translated against the current orientation and clamped to the panel.
    /// The returned `Region` streams pixels into the window and terminates the color burst
    /// when it is finished or dropped, so the window/stream/terminate cycle cannot interleave
    /// with any other use of the display.
    pub fn begin_draw(&mut self, rect: LogicalRect) -> Result<Region<'_, DI>, Error<DI::Error>> {
        let requested = rect.offset(self.config.logical_offset);
        let visible = self.start_window(rect)?;
        Ok(Region::new(self, requested, visible))
    }

    /// Translate `rect`, send the column and row windows and the memory write command. Returns
    /// the clipped logical rectangle. Nothing but `drawing` is modified, and only on success.
    fn start_window(&mut self, rect: LogicalRect) -> Result<LogicalRect, Error<DI::Error>> {
        let SequencerState { orientation, .. } = self.state;
        let geometry = self.config.geometry;
        debug!(
            "Setting draw area: x={}-{}, y={}-{} (orientation={})",
            rect.x_start,
            rect.x_end,
            rect.y_start,
            rect.y_end,
            orientation.degrees()
        );

        let visible = window::clip(rect, orientation, &geometry, self.config.logical_offset)
            .map_err(|e| {
                error!("Rejected draw area: {}", e);
                e
            })?;
        let win = window::map(visible, orientation, &geometry).map_err(|e| {
            error!("Invalid orientation state: {}", orientation.degrees());
            e
        })?;
        debug!(
            "Physical draw area: cols={}-{}, rows={}-{}",
            win.col_start, win.col_end, win.row_start, win.row_end
        );

        self.send(Command::SetColumnAddress(win.col_start, win.col_end))?;
        self.send(Command::SetRowAddress(win.row_start, win.row_end))?;
        self.send(Command::WriteMemoryStart)?;
        self.drawing = true;
        Ok(visible)
    }

    /// Terminate the current color burst. Without an open burst this does nothing. `Region`
    /// calls this itself; it only has to be called directly to recover from a region that was
    /// leaked instead of dropped.
    pub fn end_draw(&mut self) {
        if self.drawing {
            self.iface.end_pixels();
            self.drawing = false;
        } else {
            trace!("end_draw without an open color burst");
        }
    }

    /// Fill the whole logical surface with one RGB565 color.
    ///
    /// This needs a transient buffer of a full frame. It is allocated fallibly and fails with
    /// `OutOfMemory` if the allocator refuses or if the frame exceeds the configured transfer
    /// budget.
    pub fn clear(&mut self, color: u16) -> Result<(), Error<DI::Error>> {
        let (width, height) = self.size();
        let bytes = width as usize * height as usize * 2;
        info!("Clearing screen with color 0x{:04X} ({} bytes)", color, bytes);

        if bytes > self.config.max_transfer_bytes {
            error!(
                "Clear buffer of {} bytes exceeds transfer budget of {} bytes",
                bytes, self.config.max_transfer_bytes
            );
            return Err(Error::OutOfMemory { bytes });
        }
        let mut buf = Vec::new();
        if buf.try_reserve_exact(bytes).is_err() {
            error!("Failed to allocate clear buffer");
            return Err(Error::OutOfMemory { bytes });
        }
        buf.resize(bytes, 0);
        let pixel = color.to_be_bytes();
        for slot in buf.chunks_exact_mut(2) {
            slot.copy_from_slice(&pixel);
        }

        // A logical offset pushes part of the surface off the panel.
        let full = LogicalRect::new(0, width as i32 - 1, 0, height as i32 - 1);
        let mut region = self.begin_draw(full)?;
        if region.is_cropped() {
            region.draw_overscanned_raw(&buf)
        } else {
            region.draw_raw(&buf)
        }
    }

    /// Current logical `(width, height)`, which follows the orientation.
    pub fn size(&self) -> (u16, u16) {
        (self.state.params.width, self.state.params.height)
    }

    pub fn orientation(&self) -> Orientation {
        self.state.orientation
    }

    /// Current `(gap_x, gap_y)` offsets handed to the transport.
    pub fn gap(&self) -> (u16, u16) {
        (self.state.params.gap_x, self.state.params.gap_y)
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.config.geometry
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }

    fn send(&mut self, cmd: Command) -> Result<(), Error<DI::Error>> {
        cmd.send(&mut self.iface).map_err(|e| {
            error!("{:?} failed", cmd);
            Error::Transport(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::InitCommand;
    use crate::interface::test_spy::{Sent, SpyError, TestSpyInterface};
    use std::vec::Vec;

    struct NoDelay;

    impl DelayMs<u16> for NoDelay {
        fn delay_ms(&mut self, _ms: u16) {}
    }

    /// A short bootstrap so the recorded traffic stays readable.
    static BOOT: &[InitCommand] = &[InitCommand::delayed(0x11, &[]), InitCommand::new(0x29, &[])];

    fn config() -> Config {
        Config::default().init_sequence(BOOT)
    }

    /// A display which has been brought up at 90 degrees, with the spy log emptied.
    fn ready_display() -> (TestSpyInterface, Display<TestSpyInterface>) {
        let mut di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), config());
        disp.init(&mut NoDelay).unwrap();
        di.clear();
        (di, disp)
    }

    /// Everything recorded apart from pixel payloads.
    fn commands(di: &TestSpyInterface) -> Vec<Sent> {
        di.sent()
            .into_iter()
            .filter(|s| !matches!(s, Sent::Pixels(_)))
            .collect()
    }

    fn payload_len(di: &TestSpyInterface) -> usize {
        di.sent()
            .iter()
            .map(|s| match s {
                Sent::Pixels(p) => p.len(),
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn init_sequence() {
        let di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), config());
        disp.init(&mut NoDelay).unwrap();
        assert_eq!(
            commands(&di),
            vec![
                cmd!(0x11),
                cmd!(0x29),
                cmd!(0x36, [0x68]),
                Sent::Gap(0, 35),
                cmd!(0x2A, [0, 0, 0, 169]),
                cmd!(0x2B, [0, 0, 0x01, 0x3F]),
                cmd!(0x2C),
                Sent::EndPixels,
            ]
        );
        assert_eq!(payload_len(&di), 170 * 320 * 2);
        assert_eq!(disp.size(), (320, 170));
        assert_eq!(disp.orientation(), Orientation::Deg90);
    }

    #[test]
    fn init_failure_is_returned() {
        let mut di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), config());
        di.fail_command(0x29);
        assert_eq!(disp.init(&mut NoDelay), Err(Error::Transport(SpyError)));
        di.check_multi(&[cmd!(0x11)]);
    }

    #[test]
    fn set_orientation_switches_and_clears() {
        let (di, mut disp) = ready_display();
        disp.set_orientation(Orientation::Deg180).unwrap();
        assert_eq!(
            commands(&di),
            vec![
                cmd!(0x36, [0xC8]),
                Sent::Gap(35, 0),
                cmd!(0x2A, [0, 0, 0, 169]),
                cmd!(0x2B, [0, 0, 0x01, 0x3F]),
                cmd!(0x2C),
                Sent::EndPixels,
            ]
        );
        assert_eq!(disp.orientation(), Orientation::Deg180);
        assert_eq!(disp.size(), (170, 320));
        assert_eq!(disp.gap(), (35, 0));
    }

    #[test]
    fn set_orientation_degrees() {
        let (mut di, mut disp) = ready_display();
        disp.set_orientation_degrees(270).unwrap();
        assert_eq!(disp.orientation(), Orientation::Deg270);
        di.clear();

        assert_eq!(
            disp.set_orientation_degrees(45),
            Err(Error::InvalidOrientation(45))
        );
        di.check_multi(&[]);
        assert_eq!(disp.orientation(), Orientation::Deg270);
    }

    #[test]
    fn set_orientation_is_idempotent() {
        let rect = LogicalRect::new(3, 40, 7, 90);
        let windows: Vec<Vec<Sent>> = [1, 2]
            .iter()
            .map(|&times| {
                let (mut di, mut disp) = ready_display();
                for _ in 0..times {
                    disp.set_orientation(Orientation::Deg270).unwrap();
                }
                di.clear();
                disp.begin_draw(rect).unwrap().finish();
                di.sent()
            })
            .collect();
        assert_eq!(windows[0], windows[1]);
    }

    #[test]
    fn address_mode_failure_leaves_state() {
        let (mut di, mut disp) = ready_display();
        di.fail_command(0x36);
        assert_eq!(
            disp.set_orientation(Orientation::Deg0),
            Err(Error::Transport(SpyError))
        );
        di.check_multi(&[]);
        assert_eq!(disp.orientation(), Orientation::Deg90);
        assert_eq!(disp.size(), (320, 170));
    }

    #[test]
    fn gap_failure_restores_address_mode() {
        let (mut di, mut disp) = ready_display();
        di.fail_gap();
        assert_eq!(
            disp.set_orientation(Orientation::Deg0),
            Err(Error::Transport(SpyError))
        );
        di.check_multi(&[cmd!(0x36, [0x08]), cmd!(0x36, [0x68])]);
        assert_eq!(disp.orientation(), Orientation::Deg90);
        assert_eq!(disp.gap(), (0, 35));
    }

    #[test]
    fn gap_failure_before_first_orientation_sends_nothing_back() {
        let mut di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), config().init_sequence(&[]));
        di.fail_gap();
        assert!(disp.set_orientation(Orientation::Deg0).is_err());
        di.check_multi(&[cmd!(0x36, [0x08])]);
    }

    #[test]
    fn begin_draw_sends_window() {
        let (di, mut disp) = ready_display();
        disp.begin_draw(LogicalRect::new(0, 9, 0, 19))
            .unwrap()
            .finish();
        di.check_multi(&[
            cmd!(0x2A, [0, 0, 0, 19]),
            cmd!(0x2B, [0, 0, 0, 9]),
            cmd!(0x2C),
            Sent::EndPixels,
        ]);
    }

    #[test]
    fn begin_draw_failure_keeps_state_and_retry_succeeds() {
        let (mut di, mut disp) = ready_display();
        let rect = LogicalRect::new(5, 6, 7, 8);
        di.fail_command(0x2B);
        assert!(disp.begin_draw(rect).is_err());
        di.check_multi(&[cmd!(0x2A, [0, 7, 0, 8])]);
        assert_eq!(disp.orientation(), Orientation::Deg90);

        // Nothing was started, so there is no burst to end.
        disp.end_draw();
        di.check_multi(&[cmd!(0x2A, [0, 7, 0, 8])]);

        di.recover();
        di.clear();
        disp.begin_draw(rect).unwrap().finish();
        di.check_multi(&[
            cmd!(0x2A, [0, 7, 0, 8]),
            cmd!(0x2B, [0, 5, 0, 6]),
            cmd!(0x2C),
            Sent::EndPixels,
        ]);
    }

    #[test]
    fn begin_draw_rejects_unordered_rect() {
        let (di, mut disp) = ready_display();
        assert!(matches!(
            disp.begin_draw(LogicalRect::new(9, 0, 0, 0)),
            Err(Error::InvalidRect)
        ));
        di.check_multi(&[]);
    }

    #[test]
    fn end_draw_without_burst_is_a_no_op() {
        let (di, mut disp) = ready_display();
        disp.end_draw();
        disp.end_draw();
        di.check_multi(&[]);
    }

    #[test]
    fn clear_fills_big_endian() {
        let (di, mut disp) = ready_display();
        disp.clear(0xF800).unwrap();
        let sent = di.sent();
        assert_eq!(sent.len(), 5);
        match &sent[3] {
            Sent::Pixels(p) => {
                assert_eq!(p.len(), 320 * 170 * 2);
                assert!(p.chunks(2).all(|px| px == [0xF8, 0x00]));
            }
            other => panic!("expected pixels, got {:?}", other),
        }
        assert_eq!(sent[4], Sent::EndPixels);
    }

    #[test]
    fn clear_over_budget() {
        let mut di = TestSpyInterface::new();
        let mut disp = Display::new(di.split(), config().max_transfer_bytes(1024));
        assert_eq!(
            disp.clear(0xFFFF),
            Err(Error::OutOfMemory {
                bytes: 170 * 320 * 2
            })
        );
        di.check_multi(&[]);
        assert_eq!(disp.size(), (320, 170));
    }

    #[test]
    fn clear_ends_burst_on_stream_failure() {
        let (mut di, mut disp) = ready_display();
        di.fail_pixels();
        assert_eq!(disp.clear(0), Err(Error::Transport(SpyError)));
        di.check_multi(&[
            cmd!(0x2A, [0, 0, 0, 169]),
            cmd!(0x2B, [0, 0, 0x01, 0x3F]),
            cmd!(0x2C),
            Sent::EndPixels,
        ]);
    }

    #[test]
    fn clear_failure_after_switch_keeps_new_orientation() {
        let (mut di, mut disp) = ready_display();
        di.fail_pixels();
        assert!(disp.set_orientation(Orientation::Deg0).is_err());
        assert_eq!(disp.orientation(), Orientation::Deg0);
    }

    #[test]
    fn logical_offset_shifts_window() {
        let mut di = TestSpyInterface::new();
        let cfg = config()
            .initial_orientation(Orientation::Deg0)
            .logical_offset(2, 3);
        let mut disp = Display::new(di.split(), cfg);
        disp.begin_draw(LogicalRect::new(0, 9, 0, 9))
            .unwrap()
            .finish();
        di.check_multi(&[
            cmd!(0x2A, [0, 2, 0, 11]),
            cmd!(0x2B, [0, 3, 0, 12]),
            cmd!(0x2C),
            Sent::EndPixels,
        ]);
    }

    #[test]
    fn clear_with_logical_offset_streams_only_the_window() {
        let di = TestSpyInterface::new();
        let cfg = config()
            .initial_orientation(Orientation::Deg0)
            .logical_offset(2, 3);
        let mut disp = Display::new(di.split(), cfg);
        disp.clear(0xFFFF).unwrap();
        assert_eq!(
            commands(&di),
            vec![
                cmd!(0x2A, [0, 2, 0, 169]),
                cmd!(0x2B, [0, 3, 0x01, 0x3F]),
                cmd!(0x2C),
                Sent::EndPixels,
            ]
        );
        // 168 columns by 317 rows remain on the panel.
        assert_eq!(payload_len(&di), 168 * 317 * 2);
    }

    #[test]
    fn release_returns_interface() {
        let (di, disp) = ready_display();
        let mut iface = disp.release();
        iface.end_pixels();
        di.check_multi(&[Sent::EndPixels]);
    }
}
