use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use crate::pretty;

#[derive(Debug)]
pub struct Timer(Instant);

impl Timer {
    #[inline]
    pub fn start() -> Self {
        Timer(Instant::now())
    }

    #[inline]
    pub fn stop(self, bytes: u64) -> Throughput {
        Throughput {
            bytes,
            elapsed: self.0.elapsed(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Throughput {
    bytes: u64,
    elapsed: Duration,
}

impl Throughput {
    fn per_sec(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            self.bytes
        } else {
            (self.bytes as f64 / secs) as u64
        }
    }
}

impl Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} took {:.2}s - {}/s",
            pretty::bytes(self.bytes),
            self.elapsed.as_secs_f64(),
            pretty::bytes(self.per_sec())
        )
    }
}
