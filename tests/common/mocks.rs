use camlink::{Error, Result, serial::LineSource};
use std::collections::VecDeque;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// In-memory line source that raises the stop flag once drained
#[derive(Debug)]
pub struct MockLineSource {
    pending: VecDeque<Vec<u8>>,
    stop: Arc<AtomicBool>,
    pub idle_polls: usize,
    pub fail_after_drain: Option<String>,
}

impl MockLineSource {
    pub fn new(stop: Arc<AtomicBool>) -> Self {
        Self {
            pending: VecDeque::new(),
            stop,
            idle_polls: 0,
            fail_after_drain: None,
        }
    }

    pub fn with_lines(mut self, lines: &[&[u8]]) -> Self {
        self.pending = lines.iter().map(|line| line.to_vec()).collect();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.fail_after_drain = Some(error.to_string());
        self
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl LineSource for MockLineSource {
    fn bytes_available(&mut self) -> Result<u32> {
        let total: usize = self.pending.iter().map(Vec::len).sum();
        if total == 0 {
            if let Some(error) = &self.fail_after_drain {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    error.clone(),
                )));
            }
            self.idle_polls += 1;
            self.stop.store(true, Ordering::Relaxed);
        }
        Ok(total as u32)
    }

    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        Ok(self.pending.pop_front())
    }
}
