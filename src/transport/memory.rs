//! In-memory transport that records everything sent through it.
//!
//! Used by the test suite and by the CLI's `--dry-run`. Pauses are recorded
//! instead of slept.

use std::time::Duration;

use crate::error::PrinterError;

use super::Transport;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Disconnect,
    Write(Vec<u8>),
    Pause(Duration),
}

/// # Recording Transport
///
/// ```
/// use thermal_raster::transport::{MemoryTransport, Transport};
///
/// let mut transport = MemoryTransport::new();
/// transport.connect()?;
/// transport.write(b"\x1dv00")?;
/// assert_eq!(transport.bytes(), b"\x1dv00");
/// # Ok::<(), thermal_raster::PrinterError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryTransport {
    connected: bool,
    events: Vec<Event>,
    writes_left: Option<usize>,
}

impl MemoryTransport {
    /// A disconnected transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that starts out connected.
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// Fail every write after the first `writes` succeed.
    pub fn fail_after(mut self, writes: usize) -> Self {
        self.writes_left = Some(writes);
        self
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Payload of each write, in order.
    pub fn writes(&self) -> impl Iterator<Item = &[u8]> {
        self.events.iter().filter_map(|e| match e {
            Event::Write(data) => Some(data.as_slice()),
            _ => None,
        })
    }

    /// Every written byte, concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.writes().flatten().copied().collect()
    }

    /// Sum of all recorded pauses.
    pub fn total_pause(&self) -> Duration {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Pause(d) => Some(*d),
                _ => None,
            })
            .sum()
    }
}

impl Transport for MemoryTransport {
    fn connect(&mut self) -> Result<(), PrinterError> {
        self.connected = true;
        self.events.push(Event::Connect);
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.connected {
            self.connected = false;
            self.events.push(Event::Disconnect);
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn write(&mut self, data: &[u8]) -> Result<(), PrinterError> {
        if !self.connected {
            return Err(PrinterError::Transport("not connected".to_string()));
        }
        if let Some(left) = self.writes_left.as_mut() {
            if *left == 0 {
                return Err(PrinterError::Transport("write failed".to_string()));
            }
            *left -= 1;
        }
        self.events.push(Event::Write(data.to_vec()));
        Ok(())
    }

    fn pause(&mut self, delay: Duration) {
        self.events.push(Event::Pause(delay));
    }
}
