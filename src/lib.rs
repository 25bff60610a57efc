//! Driver library for the Sitronix ST7789V TFT display controller, built around an
//! orientation-aware addressing engine: logical draw rectangles are translated into the panel's
//! native column/row windows for each of the four display orientations.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(all(test, not(feature = "std")))]
#[macro_use]
extern crate std;


pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod flush;
#[cfg(feature = "graphics")]
pub mod graphics;
pub mod init;
pub mod interface;
pub mod orientation;
pub mod pattern;
#[cfg(feature = "std")]
pub mod shared;

// Re-exports for primary API.
pub use command::{AddressMode, Command};
pub use config::{Config, PanelGeometry};
pub use display::window::{LogicalRect, PhysicalWindow};
pub use display::{region::Region, Display};
pub use error::{Error, InvalidOrientation, WindowError};
pub use flush::FlushReady;
pub use init::InitCommand;
pub use interface::spi::SpiInterface;
pub use interface::DisplayInterface;
pub use orientation::{Orientation, OrientationParams};
#[cfg(feature = "std")]
pub use shared::SharedDisplay;
