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

use std::{
    fs::Metadata,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use filetime::FileTime;
use glob::Pattern;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{global::defaults::CONFIG_FILE_NAME, retention::Backup};

/// Source of the backups a policy is applied to.
pub trait Inventory {
    /// Lists every backup. The order is unspecified.
    fn list(&self) -> Result<Vec<Backup>>;
}

/// The backups stored as direct children of a local directory.
///
/// Each entry whose name matches the selection pattern is one backup. Its
/// size is the disk usage of the whole entry and its date is the entry's
/// modification time.
pub struct LocalInventory {
    root: PathBuf,
    select: Pattern,
    excluded: Option<PathBuf>,
}

impl LocalInventory {
    pub fn new(root: PathBuf, select: Pattern) -> Self {
        Self {
            root,
            select,
            excluded: None,
        }
    }

    /// Never lists `path`, even if its name matches the selection pattern.
    pub fn excluding(mut self, path: &Path) -> Result<Self> {
        self.excluded = Some(canonical_location(path)?);
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn selected_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();

        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Could not read directory {}", self.root.display()))?;

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if name == CONFIG_FILE_NAME || !self.select.matches(&name) {
                continue;
            }

            let path = entry.path();
            if let Some(excluded) = &self.excluded
                && canonical_location(&path).is_ok_and(|location| location == *excluded)
            {
                continue;
            }
            paths.push(path);
        }

        Ok(paths)
    }
}

impl Inventory for LocalInventory {
    fn list(&self) -> Result<Vec<Backup>> {
        let paths = self.selected_paths()?;
        paths.par_iter().map(|path| read_backup(path)).collect()
    }
}

/// Canonical parent directory joined with the file name. Links are
/// identified by their own location, not by their target.
fn canonical_location(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let parent = std::fs::canonicalize(parent)
        .with_context(|| format!("Could not resolve {}", parent.display()))?;
    Ok(parent.join(name))
}

fn read_backup(path: &Path) -> Result<Backup> {
    let metadata = std::fs::symlink_metadata(path)
        .with_context(|| format!("Could not stat {}", path.display()))?;

    let size = disk_usage(path, &metadata)?;
    let date = modification_date(&metadata)
        .with_context(|| format!("Invalid modification time for {}", path.display()))?;

    Ok(Backup::new(path, size, date))
}

/// Apparent size of a file, or of every file under a directory. Symlinks are
/// not followed.
pub fn disk_usage(path: &Path, metadata: &Metadata) -> Result<u64> {
    if !metadata.is_dir() {
        return Ok(metadata.len());
    }

    let mut total: u64 = 0;
    let entries =
        std::fs::read_dir(path).with_context(|| format!("Could not read {}", path.display()))?;

    for entry in entries {
        let entry = entry?;
        let child_metadata = std::fs::symlink_metadata(entry.path())?;
        total = total.saturating_add(disk_usage(&entry.path(), &child_metadata)?);
    }

    Ok(total)
}

fn modification_date(metadata: &Metadata) -> Result<DateTime<Local>> {
    let mtime = FileTime::from_last_modification_time(metadata);
    DateTime::from_timestamp(mtime.unix_seconds(), mtime.nanoseconds())
        .map(|date| date.with_timezone(&Local))
        .ok_or_else(|| anyhow!("Timestamp {} is out of range", mtime.unix_seconds()))
}
