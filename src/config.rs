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

//! Loading of the retention policy file.
//!
//! ```toml
//! select = "backup-*"
//!
//! [keep_first]
//! count = 1
//! age = "1d"
//!
//! [keep_dynamic]
//! count = 30
//! size = "200 GiB"
//!
//! [discard_last]
//! age = "2y"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Deserialize;

use crate::{
    retention::{Csa, RetentionError, RetentionPolicy},
    ui, utils,
};

/// A byte count written either as an integer or as a string with a unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Bytes(i64),
    Text(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCsa {
    count: Option<i64>,
    size: Option<SizeValue>,
    age: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    select: String,
    #[serde(default)]
    keep_first: RawCsa,
    #[serde(default)]
    keep_dynamic: RawCsa,
    #[serde(default)]
    discard_last: RawCsa,
}

/// A validated policy file.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which entries of the backup directory are backups
    pub select: Pattern,

    pub policy: RetentionPolicy,
}

impl Config {
    /// Reads and validates a policy file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;

        let select = Pattern::new(&raw.select)
            .with_context(|| format!("Invalid select pattern '{}'", raw.select))?;

        let policy = RetentionPolicy {
            keep_first: raw.keep_first.into_csa("keep_first")?,
            keep_dynamic: raw.keep_dynamic.into_csa("keep_dynamic")?,
            discard_last: raw.discard_last.into_csa("discard_last")?,
        };

        if policy.keep_dynamic.age.is_some() {
            ui::cli::warning!("keep_dynamic.age has no effect");
        }

        policy.validate()?;

        Ok(Self { select, policy })
    }
}

impl RawCsa {
    fn into_csa(self, tier: &str) -> Result<Csa> {
        let count = self
            .count
            .map(|count| {
                usize::try_from(count).map_err(|_| {
                    RetentionError::InvalidInput(format!("{tier}.count cannot be negative ({count})"))
                })
            })
            .transpose()?;

        let size = match self.size {
            None => None,
            Some(SizeValue::Bytes(bytes)) => Some(u64::try_from(bytes).map_err(|_| {
                RetentionError::InvalidInput(format!("{tier}.size cannot be negative ({bytes})"))
            })?),
            Some(SizeValue::Text(text)) => Some(
                utils::parse_size(&text).with_context(|| format!("Invalid {tier}.size"))?,
            ),
        };

        let age = self
            .age
            .map(|age| {
                utils::parse_duration_string(&age).with_context(|| format!("Invalid {tier}.age"))
            })
            .transpose()?;

        Ok(Csa { count, size, age })
    }
}
