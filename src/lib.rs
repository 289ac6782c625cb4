//! Driver for the Honeywell HIH8121 humidity/temperature sensor, built on
//! the [`embedded-hal`] blocking I2C and delay traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/0.2
//!
//! The sensor has no command set. A zero-length write to its base address
//! starts a conversion, and after the worst-case conversion time (36.65 ms,
//! we wait 40 ms) four bytes hold a 14-bit humidity and a 14-bit
//! temperature value. Conversion to physical units uses integer arithmetic
//! only and reports tenths:
//!
//! - temperature in decidegrees Celsius and Fahrenheit
//! - relative humidity in decipercent
//!
//! The raw payload carries no checksum. Garbage on the bus decodes into a
//! numerically valid but meaningless reading, never into an error.
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//! use hih8121::{Dispatcher, Hih8121, Policy};
//! # fn run<B, D>(i2c: B, delay: D) -> Result<(), hih8121::Error<B::Error>>
//! # where
//! #     B: hih8121::SmbusBlock,
//! #     D: embedded_hal::blocking::delay::DelayMs<u16>,
//! # {
//! let sensor = Hih8121::new(i2c, delay);
//! let dispatcher: Dispatcher<NoopRawMutex, _, _> = Dispatcher::new(sensor, Policy::Shared);
//!
//! let (temp_f, humidity) = dispatcher.read_temp_humid()?;
//! # let _ = (temp_f, humidity);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `defmt`: log through `defmt` and derive `defmt::Format` on public types.
//! - `log`: log through the `log` facade.
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod bus;
pub mod dispatch;
pub mod driver;
mod error;
pub mod sample;

#[cfg(test)]
mod testing;

pub use bus::SmbusBlock;
pub use dispatch::{Dispatcher, Policy, Quantity, QueryPoint, Response};
pub use driver::Hih8121;
pub use error::Error;
pub use sample::{RawSample, Reading};

/// Name the sensor registers under on a host bus.
pub const DEVICE_NAME: &str = "hih8121_i2c";
/// Fixed I2C address of the HIH8121.
pub const SENSOR_ADDRESS: u8 = 0x27;
/// Register both the trigger write and the data read address.
pub const DATA_REGISTER: u8 = 0x00;
/// Fixed wait between trigger and read. Datasheet worst case is 36.65 ms.
pub const CONVERSION_DELAY_MS: u16 = 40;
/// Size of one raw sample.
pub const SAMPLE_LEN: usize = 4;
