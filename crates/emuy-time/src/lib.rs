//! Small time wrappers so intervals and deadlines carry their unit in the type

#![warn(unused_crate_dependencies)]

use std::{fmt::Display, time::Duration};

/// Like [`Duration`] but always clear that it is whole seconds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
)]
pub struct Seconds(u64);

/// Used for request latencies where whole seconds are too coarse
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
)]
pub struct Milliseconds(u64);

/// Wall clock seconds since the unix epoch. Unlike `Instant` it keeps ticking
/// while the computer sleeps and it is available in the browser.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn now() -> Self {
        Self(
            web_time::SystemTime::UNIX_EPOCH
                .elapsed()
                .expect("expected date on system to be after the epoch")
                .as_secs(),
        )
    }

    pub fn as_local_datetime(&self) -> chrono::DateTime<chrono::Local> {
        self.as_utc_datetime().into()
    }

    pub fn display_as_locale_datetime(&self) -> String {
        self.as_local_datetime().format("%c").to_string()
    }

    pub fn as_utc_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        let secs = i64::try_from(self.0).unwrap_or(i64::MAX);
        chrono::DateTime::from_timestamp(secs, 0).unwrap_or_default()
    }

    /// Short time of day used for "last checked" labels
    pub fn display_as_local_time(&self) -> String {
        self.as_local_datetime().format("%H:%M:%S").to_string()
    }

    /// Returns the number of seconds since `past_time` or None if `past_time`
    /// is in the future
    pub fn seconds_since(self, past_time: Self) -> Option<Seconds> {
        if self.0 < past_time.0 {
            None
        } else {
            Some(self - past_time)
        }
    }

    /// Returns the number of seconds since this timestamp or None if this
    /// timestamp is in the future
    pub fn elapsed(self) -> Option<Seconds> {
        Self::now().seconds_since(self)
    }

    /// Seconds left until this timestamp, zero if it has already passed
    pub fn remaining(self) -> Seconds {
        Seconds(self.0.saturating_sub(Self::now().0))
    }

    pub fn has_passed(self) -> bool {
        Self::now() >= self
    }
}

impl std::ops::Add<Seconds> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Seconds) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub for Timestamp {
    type Output = Seconds;

    fn sub(self, rhs: Self) -> Self::Output {
        Seconds::new(self.0.saturating_sub(rhs.0))
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl Seconds {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(&self, elapsed: Seconds) -> Seconds {
        Self(self.0.saturating_sub(elapsed.0))
    }
}

impl Milliseconds {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for Seconds {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Seconds> for Duration {
    fn from(value: Seconds) -> Self {
        Duration::from_secs(value.0)
    }
}

impl From<Duration> for Seconds {
    fn from(value: Duration) -> Self {
        value.as_secs().into()
    }
}

impl From<Duration> for Milliseconds {
    fn from(value: Duration) -> Self {
        Self(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }
}

impl std::ops::Add for Seconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Display for Seconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl Display for Milliseconds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
