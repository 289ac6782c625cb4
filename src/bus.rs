//! Register-addressed block transfers, the only bus primitives the driver
//! needs.

use embedded_hal::blocking::i2c::{Write, WriteRead};

/// Largest payload of one SMBus I2C block transfer.
pub const SMBUS_BLOCK_MAX: usize = 32;

/// SMBus-style I2C block transfers.
///
/// Every `embedded-hal` bus implementing [`Write`] and [`WriteRead`] gets
/// this for free. Implement it directly for transports that can report a
/// partial transfer.
pub trait SmbusBlock {
    /// Error reported by the transport.
    type Error;

    /// Write `register` followed by `data` to the device at `address`.
    ///
    /// `data` is clamped to [`SMBUS_BLOCK_MAX`] bytes. An empty `data`
    /// puts only the register byte on the wire.
    fn block_write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read up to `buffer.len()` bytes starting at `register` and return
    /// how many were actually received.
    fn block_read(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error>;
}

impl<I> SmbusBlock for I
where
    I: Write + WriteRead<Error = <I as Write>::Error>,
{
    type Error = <I as Write>::Error;

    fn block_write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), Self::Error> {
        let len = data.len().min(SMBUS_BLOCK_MAX);
        let mut frame = [0u8; SMBUS_BLOCK_MAX + 1];
        frame[0] = register;
        frame[1..=len].copy_from_slice(&data[..len]);

        Write::write(self, address, &frame[..=len])
    }

    fn block_read(
        &mut self,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<usize, Self::Error> {
        // embedded-hal transfers are all-or-nothing
        let len = buffer.len().min(SMBUS_BLOCK_MAX);
        WriteRead::write_read(self, address, &[register], &mut buffer[..len])?;
        Ok(len)
    }
}
