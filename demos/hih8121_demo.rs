use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use hih8121::{Dispatcher, Hih8121, Policy, QueryPoint, DEVICE_NAME, SENSOR_ADDRESS};
use rppal::hal::Delay;
use rppal::i2c::I2c;
use std::thread::sleep;
use std::time::Duration;

fn main() {
    let i2c = I2c::new().expect("Init I2C failed");
    let sensor = Hih8121::new(i2c, Delay::new());
    let dispatcher: Dispatcher<NoopRawMutex, _, _> = Dispatcher::new(sensor, Policy::Shared);
    println!("{} at {:#04x}, {:?} policy", DEVICE_NAME, SENSOR_ADDRESS, dispatcher.policy());

    loop {
        for point in QueryPoint::ALL {
            match dispatcher.read(point) {
                Ok(response) => print!("{}: {}", point.name(), response),
                Err(e) => {
                    println!("{}: {}", point.name(), e);
                    return;
                }
            }
        }
        sleep(Duration::from_secs(1));
    }
}
