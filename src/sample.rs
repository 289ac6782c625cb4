//! Raw sensor payload and its conversion to physical units.

use crate::SAMPLE_LEN;

/// The four bytes returned by one acquisition, in bus order.
///
/// ```text
/// byte0: S S H H H H H H   status (discarded), humidity [13:8]
/// byte1: H H H H H H H H   humidity [7:0]
/// byte2: T T T T T T T T   temperature [13:6]
/// byte3: T T T T T T x x   temperature [5:0], unused
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample([u8; SAMPLE_LEN]);

impl RawSample {
    pub const fn from_bytes(bytes: [u8; SAMPLE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SAMPLE_LEN] {
        &self.0
    }

    /// 14-bit humidity count, status bits masked off.
    pub fn humidity_raw(&self) -> u16 {
        (u16::from(self.0[0] & 0x3F) << 8) | u16::from(self.0[1])
    }

    /// 14-bit temperature count, the two unused low bits dropped.
    pub fn temperature_raw(&self) -> u16 {
        ((u16::from(self.0[2]) << 8) + u16::from(self.0[3] & 0xFC)) >> 2
    }
}

impl From<[u8; SAMPLE_LEN]> for RawSample {
    fn from(bytes: [u8; SAMPLE_LEN]) -> Self {
        Self(bytes)
    }
}

/// Temperature and humidity decoded from one [`RawSample`], all in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    temperature_c: i32,
    temperature_f: i32,
    humidity: u32,
}

impl Reading {
    /// Convert a raw sample with integer math only.
    ///
    /// The datasheet formulas are
    ///
    /// ```text
    /// RH % = raw / 16383 * 100
    /// T °C = raw / 16384 * 165 - 40
    /// ```
    ///
    /// Scaling by 1000 and 1650 before a shift by 14 yields tenths
    /// directly. Every division truncates and nothing is rounded, which
    /// keeps results bit-identical to the kernel driver's values.
    pub fn decode(raw: RawSample) -> Self {
        let humidity = (u32::from(raw.humidity_raw()) * 1000) >> 14;
        let temperature_c = ((i32::from(raw.temperature_raw()) * 1650) >> 14) - 400;
        // Integer division truncates toward zero
        let temperature_f = temperature_c * 18 / 10 + 320;

        Self {
            temperature_c,
            temperature_f,
            humidity,
        }
    }

    /// Temperature in tenths of a degree Celsius.
    pub fn temperature_celsius(&self) -> i32 {
        self.temperature_c
    }

    /// Temperature in tenths of a degree Fahrenheit.
    pub fn temperature_fahrenheit(&self) -> i32 {
        self.temperature_f
    }

    /// Relative humidity in tenths of a percent.
    pub fn humidity(&self) -> u32 {
        self.humidity
    }
}

impl From<RawSample> for Reading {
    fn from(raw: RawSample) -> Self {
        Self::decode(raw)
    }
}
