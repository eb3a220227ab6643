use std::{fmt::Display, time::Duration};

pub const MILLIS_PER_SECOND: u64 = 1000;
pub const MILLIS_PER_MINUTE: u64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: u64 = 60 * MILLIS_PER_MINUTE;

/// Elapsed time broken down for display. `hours` is unbounded.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElapsedRecord {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub milliseconds: u16,
}

impl ElapsedRecord {
    pub fn new(hours: u64, minutes: u8, seconds: u8, milliseconds: u16) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            milliseconds,
        }
    }

    pub fn from_millis(mut millis: u64) -> Self {
        let hours = millis / MILLIS_PER_HOUR;
        millis %= MILLIS_PER_HOUR;
        let minutes = millis / MILLIS_PER_MINUTE;
        millis %= MILLIS_PER_MINUTE;
        let seconds = millis / MILLIS_PER_SECOND;
        let milliseconds = millis % MILLIS_PER_SECOND;

        Self {
            hours,
            minutes: minutes as u8,
            seconds: seconds as u8,
            milliseconds: milliseconds as u16,
        }
    }

    pub fn total_millis(&self) -> u64 {
        self.hours * MILLIS_PER_HOUR
            + self.minutes as u64 * MILLIS_PER_MINUTE
            + self.seconds as u64 * MILLIS_PER_SECOND
            + self.milliseconds as u64
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.total_millis())
    }

    /// `HH:MM:SS`, or `HH:MM:SS.mmm` when `include_milliseconds` is set.
    pub fn format(&self, include_milliseconds: bool) -> String {
        if include_milliseconds {
            format!("{self:#}")
        } else {
            format!("{self}")
        }
    }
}

impl From<Duration> for ElapsedRecord {
    fn from(duration: Duration) -> Self {
        Self::from_millis(duration.as_millis() as u64)
    }
}

impl Display for ElapsedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )?;

        if f.alternate() {
            write!(f, ".{:03}", self.milliseconds)?;
        }

        Ok(())
    }
}
