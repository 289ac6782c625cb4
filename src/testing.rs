//! Test doubles for transports an `embedded-hal` mock cannot express.

use std::sync::{Arc, Mutex};
use std::vec::Vec;

use embedded_hal::blocking::delay::DelayMs;

use crate::SmbusBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Write { address: u8, register: u8, len: usize },
    Read { address: u8, register: u8 },
}

/// A bus that answers every read with the same payload and journals
/// each transfer.
#[derive(Clone)]
pub struct ScriptedBus {
    pub write_status: Result<(), i32>,
    pub read_status: Result<usize, i32>,
    pub payload: [u8; 4],
    pub journal: Arc<Mutex<Vec<Op>>>,
}

impl ScriptedBus {
    pub fn new(payload: [u8; 4]) -> Self {
        Self {
            write_status: Ok(()),
            read_status: Ok(4),
            payload,
            journal: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn ops(&self) -> Vec<Op> {
        self.journal.lock().unwrap().clone()
    }
}

impl SmbusBlock for ScriptedBus {
    type Error = i32;

    fn block_write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<(), i32> {
        self.journal.lock().unwrap().push(Op::Write {
            address,
            register,
            len: data.len(),
        });
        self.write_status
    }

    fn block_read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<usize, i32> {
        self.journal.lock().unwrap().push(Op::Read { address, register });
        let received = self.read_status?;
        buffer[..received].copy_from_slice(&self.payload[..received]);
        Ok(received)
    }
}

/// Remembers every requested delay. Optionally sleeps for real so other
/// threads get a chance to run in between.
#[derive(Default)]
pub struct RecordingDelay {
    pub requested: Vec<u16>,
    pub sleep: bool,
}

impl DelayMs<u16> for RecordingDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.requested.push(ms);
        if self.sleep {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
    }
}
