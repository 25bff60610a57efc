//! The transport boundary of the driver. Everything above this trait deals in opcodes, parameter
//! bytes and color payloads; everything below it deals in bus signalling.

pub trait DisplayInterface {
    type Error;

    /// Send one command opcode followed by its parameter bytes, which may be empty.
    fn send_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error>;

    /// Stream color payload bytes into display RAM. Must follow a memory-write command.
    fn send_pixels(&mut self, buf: &[u8]) -> Result<(), Self::Error>;

    /// Terminate the current color burst.
    fn end_pixels(&mut self);

    /// Hand the transport the gap offsets for the current orientation. Transports which address
    /// panel memory on their own (for example a vendor panel object that re-sends address
    /// windows for its bitmap writes) must bias those windows by the gap; transports which only
    /// move bytes have nothing to do.
    fn set_gap(&mut self, _x_gap: u16, _y_gap: u16) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub mod spi {
    //! The SPI interface supports the "4-wire" serial interface of the controller, where a D/C
    //! GPIO selects between command and data bytes. The 8080 parallel bus the controller also
    //! supports needs a bus driver of its own and is expected to implement `DisplayInterface`
    //! directly.

    use embedded_hal as hal;

    use super::DisplayInterface;

    /// Failure of one of the two peripherals backing an `SpiInterface`.
    #[derive(Debug, PartialEq)]
    pub enum SpiError<S, P> {
        Spi(S),
        Pin(P),
    }

    /// 4-wire SPI transport.
    ///
    /// Only bytes are moved, so `set_gap` is the default no-op and the gap never reaches the
    /// controller: windows land at RAM address 0. A panel narrower than the controller RAM,
    /// such as the 170 pixel wide T-Display-S3 with its 35 pixel gap, needs a wrapping
    /// transport whose `set_gap` records the offsets and adds them to the column and row
    /// window parameters it forwards.
    pub struct SpiInterface<SPI, DC> {
        /// The SPI master device connected to the ST7789V.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the ST7789V.
        dc: DC,
    }

    impl<SPI, DC> SpiInterface<SPI, DC>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
    {
        /// Create a new SPI interface to communicate with the display driver. `spi` is the SPI
        /// master device, and `dc` is the GPIO output pin connected to the D/C pin of the
        /// ST7789V.
        pub fn new(spi: SPI, dc: DC) -> Self {
            Self { spi, dc }
        }

        /// Give back the SPI device and D/C pin.
        pub fn release(self) -> (SPI, DC) {
            (self.spi, self.dc)
        }
    }

    impl<SPI, DC> DisplayInterface for SpiInterface<SPI, DC>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: hal::digital::v2::OutputPin,
    {
        type Error = SpiError<SPI::Error, DC::Error>;

        fn send_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error> {
            self.dc.set_low().map_err(SpiError::Pin)?;
            self.spi.write(&[cmd]).map_err(SpiError::Spi)?;
            if params.is_empty() {
                return Ok(());
            }
            self.dc.set_high().map_err(SpiError::Pin)?;
            self.spi.write(params).map_err(SpiError::Spi)
        }

        fn send_pixels(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.dc.set_high().map_err(SpiError::Pin)?;
            self.spi.write(buf).map_err(SpiError::Spi)
        }

        // Blocking writes have already clocked out the whole burst.
        fn end_pixels(&mut self) {}
    }

}

#[cfg(test)]
pub mod test_spy {
    //! An interface for use in unit tests to spy on whatever was sent to it, and to make it fail
    //! on demand.

    use super::DisplayInterface;
    use std::sync::{Arc, Mutex};
    use std::vec::Vec;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Sent {
        Cmd(u8, Vec<u8>),
        Pixels(Vec<u8>),
        EndPixels,
        Gap(u16, u16),
    }

    #[derive(Debug, PartialEq)]
    pub struct SpyError;

    #[derive(Default)]
    struct Faults {
        command: Option<u8>,
        pixels: bool,
        gap: bool,
    }

    #[derive(Clone, Default)]
    pub struct TestSpyInterface {
        sent: Arc<Mutex<Vec<Sent>>>,
        faults: Arc<Mutex<Faults>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            Self::default()
        }

        /// Another handle onto the same record, so the test can keep inspecting after the
        /// display has taken ownership of its interface.
        pub fn split(&self) -> Self {
            self.clone()
        }

        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        pub fn check_multi(&self, expect: &[Sent]) {
            assert_eq!(self.sent().as_slice(), expect);
        }

        pub fn clear(&mut self) {
            self.sent.lock().unwrap().clear()
        }

        /// Every send of `cmd` fails until `recover`.
        pub fn fail_command(&mut self, cmd: u8) {
            self.faults.lock().unwrap().command = Some(cmd);
        }

        pub fn fail_pixels(&mut self) {
            self.faults.lock().unwrap().pixels = true;
        }

        pub fn fail_gap(&mut self) {
            self.faults.lock().unwrap().gap = true;
        }

        pub fn recover(&mut self) {
            *self.faults.lock().unwrap() = Faults::default();
        }
    }

    impl DisplayInterface for TestSpyInterface {
        type Error = SpyError;

        fn send_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), SpyError> {
            if self.faults.lock().unwrap().command == Some(cmd) {
                return Err(SpyError);
            }
            self.sent.lock().unwrap().push(Sent::Cmd(cmd, params.to_vec()));
            Ok(())
        }

        fn send_pixels(&mut self, buf: &[u8]) -> Result<(), SpyError> {
            if self.faults.lock().unwrap().pixels {
                return Err(SpyError);
            }
            self.sent.lock().unwrap().push(Sent::Pixels(buf.to_vec()));
            Ok(())
        }

        fn end_pixels(&mut self) {
            self.sent.lock().unwrap().push(Sent::EndPixels);
        }

        fn set_gap(&mut self, x_gap: u16, y_gap: u16) -> Result<(), SpyError> {
            if self.faults.lock().unwrap().gap {
                return Err(SpyError);
            }
            self.sent.lock().unwrap().push(Sent::Gap(x_gap, y_gap));
            Ok(())
        }
    }
}
