//! Maps requests for temperature and humidity onto sensor acquisitions.
//!
//! The dispatcher owns the [`Hih8121`] behind a blocking mutex. Every
//! acquisition runs trigger, delay and read inside one lock, so callers
//! sharing a dispatcher never interleave on the bus.
//!
//! How many acquisitions a request costs depends on the [`Policy`]:
//!
//! | request              | `Shared` | `PerQuantity` |
//! |----------------------|----------|---------------|
//! | `read_temp_f`        | 1        | 1             |
//! | `read_temp_humid`    | 1        | 2             |
//! | `read_all`           | 1        | 3             |
//!
//! Values returned together come from the same conversion cycle only
//! under [`Policy::Shared`].

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::blocking::delay::DelayMs;

use crate::{Error, Hih8121, Reading, SmbusBlock};

/// How a request for several quantities is served.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Policy {
    /// One acquisition feeds every quantity of a request. The values are
    /// consistent and cost a single 40 ms conversion.
    #[default]
    Shared,
    /// Each quantity triggers its own acquisition and discards the other
    /// decoded fields.
    PerQuantity,
}

/// A physical value the sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    TemperatureFahrenheit,
    TemperatureCelsius,
    Humidity,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [
        Quantity::TemperatureFahrenheit,
        Quantity::TemperatureCelsius,
        Quantity::Humidity,
    ];

    /// This quantity's value in tenths.
    pub fn select(self, reading: &Reading) -> i32 {
        match self {
            Quantity::TemperatureFahrenheit => reading.temperature_fahrenheit(),
            Quantity::TemperatureCelsius => reading.temperature_celsius(),
            // At most 999, see Reading::decode
            Quantity::Humidity => reading.humidity() as i32,
        }
    }
}

/// The named read-only query points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueryPoint {
    TempF,
    TempC,
    Humid,
    TempHumid,
}

impl QueryPoint {
    pub const ALL: [QueryPoint; 4] = [
        QueryPoint::TempF,
        QueryPoint::TempC,
        QueryPoint::Humid,
        QueryPoint::TempHumid,
    ];

    /// Attribute name a host exposes this query point under.
    pub fn name(self) -> &'static str {
        match self {
            QueryPoint::TempF => "read_temp_f",
            QueryPoint::TempC => "read_temp_c",
            QueryPoint::Humid => "read_humid",
            QueryPoint::TempHumid => "read_temp_humid",
        }
    }
}

/// Result of a query point.
///
/// `Display` renders the attribute file contents: one value per line, the
/// combined reading as Fahrenheit and humidity separated by a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    TemperatureFahrenheit(i32),
    TemperatureCelsius(i32),
    Humidity(u32),
    TemperatureHumidity { fahrenheit: i32, humidity: u32 },
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::TemperatureFahrenheit(v) | Response::TemperatureCelsius(v) => {
                writeln!(f, "{}", v)
            }
            Response::Humidity(v) => writeln!(f, "{}", v),
            Response::TemperatureHumidity {
                fahrenheit,
                humidity,
            } => writeln!(f, "{} {}", fahrenheit, humidity),
        }
    }
}

/// Shared access to one sensor under a fixed [`Policy`].
///
/// `M` picks the lock, which is held for the full 40 ms conversion:
///
/// - `NoopRawMutex` within a single execution context.
/// - `ThreadModeRawMutex` to share between tasks running in thread mode.
/// - `CriticalSectionRawMutex` to share across threads on a hosted target.
///   On a single-core MCU the critical section masks interrupts for the
///   whole 40 ms, so the delay must not depend on an interrupt (a timer
///   alarm, for example) or it never completes.
pub struct Dispatcher<M: RawMutex, B, D> {
    sensor: Mutex<M, RefCell<Hih8121<B, D>>>,
    policy: Policy,
}

impl<M, B, D> Dispatcher<M, B, D>
where
    M: RawMutex,
    B: SmbusBlock,
    D: DelayMs<u16>,
{
    pub fn new(sensor: Hih8121<B, D>, policy: Policy) -> Self {
        Self {
            sensor: Mutex::new(RefCell::new(sensor)),
            policy,
        }
    }

    /// The policy in effect.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Temperature in tenths of °F.
    pub fn read_temp_f(&self) -> Result<i32, Error<B::Error>> {
        let [fahrenheit] = self.query([Quantity::TemperatureFahrenheit])?;
        Ok(fahrenheit)
    }

    /// Temperature in tenths of °C.
    pub fn read_temp_c(&self) -> Result<i32, Error<B::Error>> {
        let [celsius] = self.query([Quantity::TemperatureCelsius])?;
        Ok(celsius)
    }

    /// Relative humidity in tenths of a percent.
    pub fn read_humid(&self) -> Result<u32, Error<B::Error>> {
        let [humidity] = self.query([Quantity::Humidity])?;
        Ok(humidity.unsigned_abs())
    }

    /// Temperature in tenths of °F and humidity in tenths of a percent.
    pub fn read_temp_humid(&self) -> Result<(i32, u32), Error<B::Error>> {
        let [fahrenheit, humidity] =
            self.query([Quantity::TemperatureFahrenheit, Quantity::Humidity])?;
        Ok((fahrenheit, humidity.unsigned_abs()))
    }

    /// All three quantities in the order of [`Quantity::ALL`]: °F, °C and
    /// humidity, in tenths.
    ///
    /// Under [`Policy::PerQuantity`] each value comes from its own
    /// conversion, so Celsius and Fahrenheit need not agree.
    pub fn read_all(&self) -> Result<[i32; 3], Error<B::Error>> {
        self.query(Quantity::ALL)
    }

    /// Serve a query point by value.
    pub fn read(&self, point: QueryPoint) -> Result<Response, Error<B::Error>> {
        Ok(match point {
            QueryPoint::TempF => Response::TemperatureFahrenheit(self.read_temp_f()?),
            QueryPoint::TempC => Response::TemperatureCelsius(self.read_temp_c()?),
            QueryPoint::Humid => Response::Humidity(self.read_humid()?),
            QueryPoint::TempHumid => {
                let (fahrenheit, humidity) = self.read_temp_humid()?;
                Response::TemperatureHumidity {
                    fahrenheit,
                    humidity,
                }
            }
        })
    }

    /// Any set of quantities, values in tenths, in request order.
    ///
    /// An empty request performs no acquisition.
    pub fn query<const N: usize>(
        &self,
        quantities: [Quantity; N],
    ) -> Result<[i32; N], Error<B::Error>> {
        let mut values = [0; N];
        if N == 0 {
            return Ok(values);
        }

        match self.policy {
            Policy::Shared => {
                let reading = self.acquire()?;
                values = quantities.map(|quantity| quantity.select(&reading));
                debug!("{:?}: 1 acquisition for {} quantities", self.policy, N);
            }
            Policy::PerQuantity => {
                for (value, quantity) in values.iter_mut().zip(quantities) {
                    *value = quantity.select(&self.acquire()?);
                }
                debug!("{:?}: {} acquisitions for {} quantities", self.policy, N, N);
            }
        }

        trace!("served {:?}", quantities);
        Ok(values)
    }

    /// Release the sensor.
    pub fn free(self) -> Hih8121<B, D> {
        self.sensor.into_inner().into_inner()
    }

    fn acquire(&self) -> Result<Reading, Error<B::Error>> {
        self.sensor.lock(|sensor| sensor.borrow_mut().read())
    }
}
