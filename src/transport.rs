// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use tracing::info;

use crate::config::patch::Serial;

/// The write timeout for serial ports.
const SERIAL_TIMEOUT: Duration = Duration::from_secs(1);

/// A line oriented transport to the DMX controller. The link is assumed
/// reliable and ordered; commands are fire-and-forget and never read back.
pub trait LineTransport {
    /// Writes a single command line to the transport.
    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// A transport backed by a serial port.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    /// Opens the serial device at the given path and baud rate.
    pub fn open(device: &str, baud_rate: u32) -> Result<SerialTransport, serialport::Error> {
        let port = serialport::new(device, baud_rate)
            .timeout(SERIAL_TIMEOUT)
            .open()?;
        Ok(SerialTransport { port })
    }
}

impl LineTransport for SerialTransport {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()
    }
}

/// A transport that prints commands to stdout. Used when no serial device is
/// configured so a patch can be exercised without hardware.
pub struct ConsoleTransport {}

impl LineTransport for ConsoleTransport {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        println!("{}", line);
        Ok(())
    }
}

/// Creates a transport for the given serial settings. Falls back to stdout
/// when no device is configured.
pub fn create_transport(serial: Option<&Serial>) -> Result<Box<dyn LineTransport>, Box<dyn Error>> {
    if let Some(serial) = serial {
        if let Some(device) = serial.device() {
            let baud_rate = serial.baud_rate();
            info!(device = device, baud_rate = baud_rate, "Opening serial device.");
            return Ok(Box::new(SerialTransport::open(device, baud_rate)?));
        }
    }

    info!("No serial device configured, writing commands to stdout.");
    Ok(Box::new(ConsoleTransport {}))
}

#[cfg(test)]
/// A transport that records every line written, for tests.
pub struct RecordingTransport {
    pub lines: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    pub should_fail: bool,
}

#[cfg(test)]
impl RecordingTransport {
    pub fn new() -> RecordingTransport {
        RecordingTransport {
            lines: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// Gets a handle to the recorded lines that stays valid after the
    /// transport has been handed to a universe.
    pub fn lines_handle(&self) -> std::sync::Arc<std::sync::Mutex<Vec<String>>> {
        self.lines.clone()
    }
}

#[cfg(test)]
impl LineTransport for RecordingTransport {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if self.should_fail {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "recording transport failure",
            ));
        }
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
