//! Serial port configuration and connection handling.

use super::LineSource;
use crate::{Result, config::SerialConfig};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_BAUD_RATE: u32 = 115_200;

#[derive(Debug, Clone)]
pub struct PortSettings {
    /// Device path, e.g. /dev/ttyUSB0 or COM3
    pub port_path: String,
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    pub timeout: Duration,
}

impl PortSettings {
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Duration::from_secs(1),
        }
    }

    pub fn from_config(port_path: &str, config: &SerialConfig) -> Self {
        Self {
            baud_rate: config.baud_rate,
            timeout: config.timeout(),
            ..Self::new(port_path)
        }
    }
}

/// An open serial port. The port is closed when this value is dropped.
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
    settings: PortSettings,
}

impl SerialConnection {
    pub fn open(settings: PortSettings) -> Result<Self> {
        let port = serialport::new(&settings.port_path, settings.baud_rate)
            .data_bits(settings.data_bits)
            .parity(settings.parity)
            .stop_bits(settings.stop_bits)
            .flow_control(settings.flow_control)
            .timeout(settings.timeout)
            .open()?;

        info!(
            "Opened serial port {} at {} baud",
            settings.port_path, settings.baud_rate
        );
        Ok(Self { port, settings })
    }
}

impl LineSource for SerialConnection {
    fn bytes_available(&mut self) -> Result<u32> {
        Ok(self.port.bytes_to_read()?)
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut buffer = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    buffer.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::TimedOut => break,
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if buffer.is_empty() {
            Ok(None)
        } else {
            Ok(Some(buffer))
        }
    }
}

impl Drop for SerialConnection {
    fn drop(&mut self) {
        debug!("Closing serial port {}", self.settings.port_path);
    }
}
