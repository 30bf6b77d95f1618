// Copyright (c) 2025 - Cowboy AI, Inc.
//! Time and DeltaTime
//!
//! Instants are nanoseconds relative to the Unix epoch. Offsets are signed.
//! Arithmetic is exact inside the representable range and saturates at its
//! bounds, so stepping a sequence with `Time::MAX` through a negative delay
//! never overflows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Totally ordered instant
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time {
    nanos: i64,
}

impl Time {
    /// Earliest representable instant
    pub const MIN: Time = Time { nanos: i64::MIN };

    /// Latest representable instant
    pub const MAX: Time = Time { nanos: i64::MAX };

    /// The Unix epoch
    pub const EPOCH: Time = Time { nanos: 0 };

    /// Instant `nanos` nanoseconds after the epoch
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Instant `millis` milliseconds after the epoch
    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    /// Nanoseconds since the epoch
    pub const fn as_nanos(self) -> i64 {
        self.nanos
    }

    /// Current wall-clock instant
    pub fn now() -> Self {
        Self::from(chrono::Utc::now())
    }

    /// Convert back to a calendar timestamp
    pub fn to_datetime(self) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_nanos(self.nanos)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for Time {
    fn from(value: chrono::DateTime<chrono::Utc>) -> Self {
        // Outside ~1677..2262 chrono cannot express nanoseconds; clamp.
        let nanos = value.timestamp_nanos_opt().unwrap_or(if value.timestamp() < 0 {
            i64::MIN
        } else {
            i64::MAX
        });
        Self { nanos }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}ns", self.nanos)
    }
}

/// Signed offset between two instants
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeltaTime {
    nanos: i64,
}

impl DeltaTime {
    /// No offset
    pub const ZERO: DeltaTime = DeltaTime { nanos: 0 };

    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs.saturating_mul(1_000_000_000),
        }
    }

    pub const fn as_nanos(self) -> i64 {
        self.nanos
    }
}

impl From<std::time::Duration> for DeltaTime {
    fn from(value: std::time::Duration) -> Self {
        Self {
            nanos: i64::try_from(value.as_nanos()).unwrap_or(i64::MAX),
        }
    }
}

impl From<chrono::Duration> for DeltaTime {
    fn from(value: chrono::Duration) -> Self {
        let nanos = value.num_nanoseconds().unwrap_or(if value < chrono::Duration::zero() {
            i64::MIN
        } else {
            i64::MAX
        });
        Self { nanos }
    }
}

impl fmt::Display for DeltaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.nanos)
    }
}

impl Add<DeltaTime> for Time {
    type Output = Time;

    fn add(self, rhs: DeltaTime) -> Time {
        Time {
            nanos: self.nanos.saturating_add(rhs.nanos),
        }
    }
}

impl AddAssign<DeltaTime> for Time {
    fn add_assign(&mut self, rhs: DeltaTime) {
        *self = *self + rhs;
    }
}

impl Sub<DeltaTime> for Time {
    type Output = Time;

    fn sub(self, rhs: DeltaTime) -> Time {
        Time {
            nanos: self.nanos.saturating_sub(rhs.nanos),
        }
    }
}

impl SubAssign<DeltaTime> for Time {
    fn sub_assign(&mut self, rhs: DeltaTime) {
        *self = *self - rhs;
    }
}

impl Sub<Time> for Time {
    type Output = DeltaTime;

    fn sub(self, rhs: Time) -> DeltaTime {
        DeltaTime {
            nanos: self.nanos.saturating_sub(rhs.nanos),
        }
    }
}

impl Add for DeltaTime {
    type Output = DeltaTime;

    fn add(self, rhs: DeltaTime) -> DeltaTime {
        DeltaTime {
            nanos: self.nanos.saturating_add(rhs.nanos),
        }
    }
}

impl Sub for DeltaTime {
    type Output = DeltaTime;

    fn sub(self, rhs: DeltaTime) -> DeltaTime {
        DeltaTime {
            nanos: self.nanos.saturating_sub(rhs.nanos),
        }
    }
}

impl Neg for DeltaTime {
    type Output = DeltaTime;

    fn neg(self) -> DeltaTime {
        DeltaTime {
            nanos: self.nanos.saturating_neg(),
        }
    }
}
