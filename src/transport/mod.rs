//! # Printer Transport Layer
//!
//! This module provides the byte sinks a print job is streamed into.
//!
//! ## Available Transports
//!
//! - [`bluetooth`]: Bluetooth RFCOMM with discovery by name (Linux)
//! - [`memory`]: records writes and pauses, for tests and dry runs
//!
//! Writes are best effort: nothing is acknowledged by the printer, so a
//! successful `write` only means the bytes left this process.

use std::thread;
use std::time::Duration;

use crate::error::PrinterError;

pub mod bluetooth;
pub mod memory;

pub use bluetooth::{BluetoothTransport, DiscoveredDevice};
pub use memory::MemoryTransport;

/// A byte-stream connection to a printer.
pub trait Transport {
    /// Open the connection.
    fn connect(&mut self) -> Result<(), PrinterError>;

    /// Close the connection. Does nothing when already closed.
    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Hand `data` to the link.
    fn write(&mut self, data: &[u8]) -> Result<(), PrinterError>;

    /// Wait before the next write to let the printer drain its buffer.
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn connect(&mut self) -> Result<(), PrinterError> {
        (**self).connect()
    }

    fn disconnect(&mut self) {
        (**self).disconnect()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn write(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        (**self).write(data)
    }

    fn pause(&mut self, delay: Duration) {
        (**self).pause(delay)
    }
}
