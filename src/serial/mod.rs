//! Line-oriented serial monitoring for microcontroller debug output.

pub mod monitor;
pub mod port;

pub use monitor::{SerialMonitor, decode_line};
pub use port::{PortSettings, SerialConnection};

use crate::Result;

/// A byte source that can be polled for pending input and read line by line.
pub trait LineSource {
    /// Number of bytes waiting to be read.
    fn bytes_available(&mut self) -> Result<u32>;

    /// Reads up to and including the next `\n`. Returns a partial line if the
    /// read times out mid-line, or `None` if nothing arrived.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>>;
}
