use super::LineSource;
use crate::Result;
use std::{
    io::Write,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};
use tracing::{debug, trace};

/// Decodes a raw line as UTF-8, dropping invalid sequences, and trims it.
pub fn decode_line(bytes: &[u8]) -> String {
    let decoded: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    decoded.trim().to_string()
}

/// Polls a line source and echoes each non-empty line to a sink.
pub struct SerialMonitor {
    poll_interval: Duration,
}

impl SerialMonitor {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Runs until `stop` is set. Returns the number of lines written.
    pub fn run<S, W>(&self, source: &mut S, sink: &mut W, stop: &AtomicBool) -> Result<usize>
    where
        S: LineSource + ?Sized,
        W: Write,
    {
        let mut printed = 0;

        while !stop.load(Ordering::Relaxed) {
            if source.bytes_available()? == 0 {
                std::thread::sleep(self.poll_interval);
                continue;
            }

            let Some(raw) = source.read_line()? else {
                continue;
            };

            let line = decode_line(&raw);
            if line.is_empty() {
                trace!("Skipping blank line");
                continue;
            }

            writeln!(sink, "{}", line)?;
            sink.flush()?;
            printed += 1;
        }

        debug!("Serial monitor stopped after {} lines", printed);
        Ok(printed)
    }
}
