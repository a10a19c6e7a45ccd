// geobrs is a geometric backup retention tool
// Copyright (C) 2025  Javier Lancha Vázquez <javier.lancha@gmail.com>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Retention decision engine.
//!
//! Backups are classified in three tiers evaluated in a fixed order:
//! `keep_first` forces the newest backups into the kept set, `discard_last`
//! forces the backups that break the hard limits into the deleted set and
//! `keep_dynamic` resolves whatever is left with the [`DensitySelector`].

pub mod density;
pub mod solver;

use std::path::PathBuf;

use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;
use thiserror::Error;

pub use density::DensitySelector;
pub use solver::solve;

pub type Result<T> = std::result::Result<T, RetentionError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetentionError {
    /// Malformed thresholds or density keys.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Thresholds that force the same backup to be kept and discarded.
    #[error("Configuration conflict: {0}")]
    ConfigurationConflict(String),
}

/// A stored backup artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Backup {
    /// Location or identifier of the backup
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,

    /// Time at which the backup was taken
    pub date: DateTime<Local>,
}

impl Backup {
    pub fn new(path: impl Into<PathBuf>, size: u64, date: DateTime<Local>) -> Self {
        Self {
            path: path.into(),
            size,
            date,
        }
    }

    /// Seconds since the UNIX epoch, used as the density key.
    pub(crate) fn timestamp_key(&self) -> f64 {
        self.date.timestamp_micros() as f64 / 1_000_000.0
    }
}

/// Count, Size and Age criteria. Every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Csa {
    pub count: Option<usize>,
    pub size: Option<u64>,
    pub age: Option<TimeDelta>,
}

impl Csa {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_age(mut self, age: TimeDelta) -> Self {
        self.age = Some(age);
        self
    }

    /// Resolves the missing fields with `defaults`.
    pub fn normalize_or(&self, defaults: Limits) -> Limits {
        Limits {
            count: self.count.unwrap_or(defaults.count),
            size: self.size.unwrap_or(defaults.size),
            age: self.age.unwrap_or(defaults.age),
        }
    }

    fn validate(&self, tier: &str) -> Result<()> {
        match self.age {
            Some(age) if age < TimeDelta::zero() => Err(RetentionError::InvalidInput(format!(
                "{tier}.age cannot be negative ({age})"
            ))),
            _ => Ok(()),
        }
    }
}

/// A [`Csa`] with every field resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub count: usize,
    pub size: u64,
    pub age: TimeDelta,
}

impl Limits {
    /// No minimum at all.
    pub fn zero() -> Self {
        Self {
            count: 0,
            size: 0,
            age: TimeDelta::zero(),
        }
    }

    /// No limit at all.
    pub fn unbounded() -> Self {
        Self {
            count: usize::MAX,
            size: u64::MAX,
            age: TimeDelta::max_value(),
        }
    }

    /// True if `date` is newer than `now - age`. An age reaching beyond the
    /// representable range covers every date.
    pub fn is_within_age(&self, date: DateTime<Local>, now: DateTime<Local>) -> bool {
        now.checked_sub_signed(self.age)
            .is_none_or(|cutoff| date > cutoff)
    }

    /// True if `date` is older than `now - age`.
    pub fn is_past_age(&self, date: DateTime<Local>, now: DateTime<Local>) -> bool {
        now.checked_sub_signed(self.age)
            .is_some_and(|cutoff| date < cutoff)
    }
}

/// The three retention tiers, in evaluation order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Always keep the newest backups matching any of these minimums.
    pub keep_first: Csa,

    /// Budget for the contested backups.
    pub keep_dynamic: Csa,

    /// Always discard the backups past any of these limits.
    pub discard_last: Csa,
}

impl RetentionPolicy {
    /// Rejects negative ages and `keep_first` minimums that exceed the
    /// `discard_last` limits.
    pub fn validate(&self) -> Result<()> {
        self.keep_first.validate("keep_first")?;
        self.keep_dynamic.validate("keep_dynamic")?;
        self.discard_last.validate("discard_last")?;

        let keep = &self.keep_first;
        let discard = &self.discard_last;

        if let (Some(k), Some(d)) = (keep.count, discard.count)
            && k > d
        {
            return Err(RetentionError::ConfigurationConflict(format!(
                "keep_first.count ({k}) exceeds discard_last.count ({d})"
            )));
        }
        if let (Some(k), Some(d)) = (keep.size, discard.size)
            && k > d
        {
            return Err(RetentionError::ConfigurationConflict(format!(
                "keep_first.size ({k} bytes) exceeds discard_last.size ({d} bytes)"
            )));
        }
        if let (Some(k), Some(d)) = (keep.age, discard.age)
            && k > d
        {
            return Err(RetentionError::ConfigurationConflict(format!(
                "keep_first.age ({k}) exceeds discard_last.age ({d})"
            )));
        }

        Ok(())
    }
}

/// Result of a retention run. Every input backup is in exactly one side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub keep: Vec<Backup>,
    pub delete: Vec<Backup>,
}

impl Partition {
    pub fn keep_size(&self) -> u64 {
        total_size(&self.keep)
    }

    pub fn delete_size(&self) -> u64 {
        total_size(&self.delete)
    }

    pub fn len(&self) -> usize {
        self.keep.len() + self.delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keep.is_empty() && self.delete.is_empty()
    }
}

pub(crate) fn total_size(backups: &[Backup]) -> u64 {
    backups
        .iter()
        .fold(0u64, |acc, backup| acc.saturating_add(backup.size))
}
