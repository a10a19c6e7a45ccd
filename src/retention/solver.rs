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

use chrono::{DateTime, Local};

use super::{Backup, DensitySelector, Limits, Partition, Result, RetentionPolicy};

/// Splits `backups` into the ones to keep and the ones to delete.
///
/// `now` is the reference point for every age threshold. The result covers
/// the whole input: each backup ends up in exactly one side. Nothing is
/// returned if the policy is invalid or, when several backups are contested,
/// one of them has a timestamp at or before the UNIX epoch.
pub fn solve(
    backups: &[Backup],
    policy: &RetentionPolicy,
    now: DateTime<Local>,
) -> Result<Partition> {
    policy.validate()?;

    let keep_first = policy.keep_first.normalize_or(Limits::zero());
    let keep_dynamic = policy.keep_dynamic.normalize_or(Limits::unbounded());
    let discard_last = policy.discard_last.normalize_or(Limits::unbounded());

    // Newest first
    let mut sorted: Vec<Backup> = backups.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut partition = Partition::default();

    let unassigned = keep_newest(sorted, &keep_first, now, &mut partition);
    let contested = discard_oldest(unassigned, &discard_last, now, &mut partition);

    // A lone contested backup has no neighbour to be weighed against
    if contested.len() <= 1 {
        partition.keep.extend(contested);
        return Ok(partition);
    }

    keep_spread(contested, &keep_dynamic, &mut partition)?;

    Ok(partition)
}

/// Moves every backup that meets one of the `keep_first` minimums into the
/// kept set. Returns the rest, still sorted newest first.
fn keep_newest(
    sorted: Vec<Backup>,
    limits: &Limits,
    now: DateTime<Local>,
    partition: &mut Partition,
) -> Vec<Backup> {
    let mut kept_size: u64 = 0;
    let mut unassigned = Vec::new();

    for backup in sorted {
        let forced = partition.keep.len() < limits.count
            || limits.is_within_age(backup.date, now)
            || kept_size < limits.size;

        if forced {
            kept_size = kept_size.saturating_add(backup.size);
            partition.keep.push(backup);
        } else {
            unassigned.push(backup);
        }
    }

    unassigned
}

/// Moves every backup that breaks one of the `discard_last` limits into the
/// deleted set. The running totals include the kept set and the backups
/// already admitted by this tier.
fn discard_oldest(
    unassigned: Vec<Backup>,
    limits: &Limits,
    now: DateTime<Local>,
    partition: &mut Partition,
) -> Vec<Backup> {
    let mut running_count = partition.keep.len();
    let mut running_size = partition.keep_size();
    let mut contested = Vec::new();

    for backup in unassigned {
        let forced = limits.is_past_age(backup.date, now)
            || running_size.saturating_add(backup.size) > limits.size
            || running_count >= limits.count;

        if forced {
            partition.delete.push(backup);
        } else {
            running_count += 1;
            running_size = running_size.saturating_add(backup.size);
            contested.push(backup);
        }
    }

    contested
}

/// Fills what is left of the `keep_dynamic` budget with the contested
/// backups, least redundant first.
fn keep_spread(contested: Vec<Backup>, limits: &Limits, partition: &mut Partition) -> Result<()> {
    let remaining_count = limits.count.saturating_sub(partition.keep.len());
    let remaining_size = limits.size.saturating_sub(partition.keep_size());

    let mut selector = DensitySelector::new(contested.into_iter().map(|backup| {
        let key = backup.timestamp_key();
        (backup, key)
    }))?;

    // Most redundant first, the survivor last
    let mut discard_order: Vec<Backup> = selector.by_ref().collect();
    discard_order.extend(selector.into_remaining().into_iter().map(|(backup, _)| backup));

    let mut kept_count: usize = 0;
    let mut kept_size: u64 = 0;

    for backup in discard_order.into_iter().rev() {
        let new_size = kept_size
            .checked_add(backup.size)
            .filter(|size| *size <= remaining_size);

        match new_size {
            Some(size) if kept_count < remaining_count => {
                kept_count += 1;
                kept_size = size;
                partition.keep.push(backup);
            }
            _ => partition.delete.push(backup),
        }
    }

    Ok(())
}
