//! The trigger, wait, read transaction against the sensor.

use embedded_hal::blocking::delay::DelayMs;

use crate::{
    Error, RawSample, Reading, SmbusBlock, CONVERSION_DELAY_MS, DATA_REGISTER, SAMPLE_LEN,
    SENSOR_ADDRESS,
};

/// HIH8121 on bus `B`, waiting with `D`.
///
/// Methods take `&mut self`, so one owner performs one acquisition at a
/// time. Share a sensor between callers through a
/// [`Dispatcher`](crate::Dispatcher).
pub struct Hih8121<B, D> {
    bus: B,
    delay: D,
}

impl<B, D> Hih8121<B, D>
where
    B: SmbusBlock,
    D: DelayMs<u16>,
{
    pub fn new(bus: B, delay: D) -> Self {
        Self { bus, delay }
    }

    /// Run one conversion cycle and return the raw payload.
    ///
    /// The sensor has no start command and the transport may lack a quick
    /// write, so a zero-length block write to register `0x00` triggers the
    /// conversion. We then block for a fixed 40 ms instead of polling the
    /// status bits and read four bytes back.
    ///
    /// # Errors
    ///
    /// - [`Error::Write`] when the trigger fails; the read is skipped.
    /// - [`Error::Read`] when the block read fails.
    /// - [`Error::ShortRead`] when fewer than four bytes arrive.
    pub fn acquire_raw(&mut self) -> Result<RawSample, Error<B::Error>> {
        self.bus
            .block_write(SENSOR_ADDRESS, DATA_REGISTER, &[])
            .map_err(|e| {
                error!("trigger write to {:#x} failed", SENSOR_ADDRESS);
                Error::Write(e)
            })?;

        self.delay.delay_ms(CONVERSION_DELAY_MS);

        let mut buffer = [0u8; SAMPLE_LEN];
        let received = self
            .bus
            .block_read(SENSOR_ADDRESS, DATA_REGISTER, &mut buffer)
            .map_err(|e| {
                error!("block read from {:#x} failed", SENSOR_ADDRESS);
                Error::Read(e)
            })?;

        if received < SAMPLE_LEN {
            warn!("short read: {} of {} bytes", received, SAMPLE_LEN);
            return Err(Error::ShortRead { received });
        }

        trace!("raw sample {:?}", buffer);
        Ok(RawSample::from_bytes(buffer))
    }

    /// Acquire a fresh sample and decode it.
    pub fn read(&mut self) -> Result<Reading, Error<B::Error>> {
        self.acquire_raw().map(Reading::decode)
    }

    /// Release the bus and the delay.
    pub fn free(self) -> (B, D) {
        (self.bus, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::Hih8121;
    use crate::testing::{Op, RecordingDelay, ScriptedBus};
    use crate::{Error, Reading, SENSOR_ADDRESS};
    use embedded_hal_mock::delay::MockNoop as MockDelay;
    use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction};
    use embedded_hal_mock::MockError;
    use std::io::ErrorKind;

    fn trigger() -> Transaction {
        Transaction::write(SENSOR_ADDRESS, vec![0x00])
    }

    fn fetch(payload: [u8; 4]) -> Transaction {
        Transaction::write_read(SENSOR_ADDRESS, vec![0x00], payload.to_vec())
    }

    #[test]
    fn acquire_triggers_then_reads() {
        let expectations = [trigger(), fetch([0x1A, 0x2B, 0x63, 0x9C])];
        let mut hih = Hih8121::new(I2cMock::new(&expectations), MockDelay::new());

        let raw = hih.acquire_raw().unwrap();
        assert_eq!(raw.as_bytes(), &[0x1A, 0x2B, 0x63, 0x9C]);

        let (mut mock, _) = hih.free();
        mock.done();
    }

    #[test]
    fn talks_to_fixed_address_and_waits_between_write_and_read() {
        let bus = ScriptedBus::new([0x00; 4]);
        let journal = bus.clone();
        let mut hih = Hih8121::new(bus, RecordingDelay::default());

        hih.acquire_raw().unwrap();

        assert_eq!(
            journal.ops(),
            [
                Op::Write { address: 0x27, register: 0x00, len: 0 },
                Op::Read { address: 0x27, register: 0x00 },
            ]
        );
        let (_, delay) = hih.free();
        assert_eq!(delay.requested, [40]);
    }

    #[test]
    fn read_decodes_fresh_sample() {
        let expectations = [trigger(), fetch([0x3F, 0xFF, 0xFF, 0xFC])];
        let mut hih = Hih8121::new(I2cMock::new(&expectations), MockDelay::new());

        let reading = hih.read().unwrap();
        assert_eq!(reading.humidity(), 999);
        assert_eq!(reading.temperature_celsius(), 1249);
        assert_eq!(reading.temperature_fahrenheit(), 2568);

        let (mut mock, _) = hih.free();
        mock.done();
    }

    #[test]
    fn each_call_is_a_new_conversion() {
        let expectations = [
            trigger(),
            fetch([0x00, 0x00, 0x00, 0x00]),
            trigger(),
            fetch([0x1A, 0x2B, 0x63, 0x9C]),
        ];
        let mut hih = Hih8121::new(I2cMock::new(&expectations), MockDelay::new());

        let first = hih.read().unwrap();
        let second = hih.read().unwrap();
        assert_eq!(first.temperature_celsius(), -400);
        assert_eq!(second.temperature_celsius(), 242);

        let (mut mock, _) = hih.free();
        mock.done();
    }

    #[test]
    fn write_failure_skips_read() {
        // No read transaction is scripted: reaching it would fail the mock.
        let expectations = [trigger().with_error(MockError::Io(ErrorKind::Other))];
        let mut hih = Hih8121::new(I2cMock::new(&expectations), MockDelay::new());

        assert_eq!(
            hih.acquire_raw(),
            Err(Error::Write(MockError::Io(ErrorKind::Other)))
        );

        let (mut mock, _) = hih.free();
        mock.done();
    }

    #[test]
    fn write_failure_skips_delay() {
        let mut bus = ScriptedBus::new([0x00; 4]);
        bus.write_status = Err(-121);
        let journal = bus.clone();
        let mut hih = Hih8121::new(bus, RecordingDelay::default());

        assert_eq!(hih.read(), Err(Error::Write(-121)));

        assert_eq!(journal.ops().len(), 1);
        let (_, delay) = hih.free();
        assert!(delay.requested.is_empty());
    }

    #[test]
    fn read_failure_keeps_bus_status() {
        let expectations = [
            trigger(),
            fetch([0x00; 4]).with_error(MockError::Io(ErrorKind::Other)),
        ];
        let mut hih = Hih8121::new(I2cMock::new(&expectations), MockDelay::new());

        let err = hih.acquire_raw().unwrap_err();
        assert_eq!(err, Error::Read(MockError::Io(ErrorKind::Other)));
        assert!(err.is_read_failure());

        let (mut mock, _) = hih.free();
        mock.done();
    }

    #[test]
    fn short_read_is_an_io_error() {
        for received in 0..4 {
            let mut bus = ScriptedBus::new([0x1A, 0x2B, 0x63, 0x9C]);
            bus.read_status = Ok(received);
            let mut hih = Hih8121::new(bus, RecordingDelay::default());

            assert_eq!(hih.acquire_raw(), Err(Error::ShortRead { received }));
        }
    }

    #[test]
    fn short_read_never_yields_a_reading() {
        let mut bus = ScriptedBus::new([0x1A, 0x2B, 0x63, 0x9C]);
        bus.read_status = Ok(3);
        let mut hih = Hih8121::new(bus, RecordingDelay::default());

        let result: Result<Reading, _> = hih.read();
        assert!(result.unwrap_err().is_read_failure());
    }
}
