// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Jamie Adams (a.k.a, Imodium Operator)
// ===========================================================================
//! MLS range primitive for SELinux contexts.
//!
//! A range pairs a low and a high [`MlsLevel`], representing the clearance
//! span a subject or object may hold:
//!
//! ```text
//! s0
//! s0-s3
//! s0:c0-s3:c0,c1,c2
//! ```
//!
//! When the low and high levels are identical, the canonical string form
//! collapses to a single level (no trailing `-`).
//!
//! This primitive parses the `low[-high]` shape only; the dotted
//! category-range atom (`c0.c1023`) used inside a single level's category
//! list belongs to `umrs-sepolicy`'s own category-set expansion and is out
//! of scope for this crate's `CategorySet::from_str`.
// ===========================================================================

use std::fmt;
use std::str::FromStr;

use super::level::{MlsLevel, MlsLevelError};

/// Represents a low-high clearance range over two [`MlsLevel`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use]
pub struct MlsRange {
    low: MlsLevel,
    high: MlsLevel,
}

impl MlsRange {
    /// Constructs a range from already-validated low/high levels.
    pub const fn new(low: MlsLevel, high: MlsLevel) -> Self {
        Self { low, high }
    }

    /// Constructs a degenerate range whose low and high levels match.
    pub fn single(level: MlsLevel) -> Self {
        Self {
            low: level.clone(),
            high: level,
        }
    }

    #[must_use]
    pub const fn low(&self) -> &MlsLevel {
        &self.low
    }

    #[must_use]
    pub const fn high(&self) -> &MlsLevel {
        &self.high
    }
}

/// Errors that can occur while parsing an MLS range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlsRangeError {
    Empty,
    InvalidLow(MlsLevelError),
    InvalidHigh(MlsLevelError),
}

impl fmt::Display for MlsRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "MLS range cannot be empty"),
            Self::InvalidLow(err) => write!(f, "invalid low level in MLS range: {err}"),
            Self::InvalidHigh(err) => write!(f, "invalid high level in MLS range: {err}"),
        }
    }
}

impl std::error::Error for MlsRangeError {}

impl fmt::Display for MlsRange {
    /// Serializes the range into canonical `SELinux` form.
    ///
    /// Collapses to a single level when `low == high`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

impl FromStr for MlsRange {
    type Err = MlsRangeError;

    /// Parses an MLS range from canonical string form.
    ///
    /// The split point is the first `-`, which is safe because category
    /// spans use `.` (`c0.c1023`) and category lists use `,` (`c0,c3`) —
    /// neither a bare level nor a category token ever contains `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(MlsRangeError::Empty);
        }

        match s.split_once('-') {
            None => {
                let level = MlsLevel::from_str(s).map_err(MlsRangeError::InvalidLow)?;
                Ok(Self::single(level))
            }
            Some((low_raw, high_raw)) => {
                let low = MlsLevel::from_str(low_raw).map_err(MlsRangeError::InvalidLow)?;
                let high = MlsLevel::from_str(high_raw).map_err(MlsRangeError::InvalidHigh)?;
                Ok(Self::new(low, high))
            }
        }
    }
}
