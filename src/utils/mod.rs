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

use anyhow::{Result, anyhow, bail};

#[allow(non_upper_case_globals)]
pub mod size {
    pub const KiB: u64 = 1024;
    pub const MiB: u64 = KiB * 1024;
    pub const GiB: u64 = MiB * 1024;
    pub const TiB: u64 = GiB * 1024;

    pub const KB: u64 = 1000;
    pub const MB: u64 = KB * 1000;
    pub const GB: u64 = MB * 1000;
    pub const TB: u64 = GB * 1000;
}

pub fn format_size(bytes: u64) -> String {
    if bytes >= size::TiB {
        format!("{:.2} TiB", (bytes as f64) / (size::TiB as f64))
    } else if bytes >= size::GiB {
        format!("{:.2} GiB", (bytes as f64) / (size::GiB as f64))
    } else if bytes >= size::MiB {
        format!("{:.2} MiB", (bytes as f64) / (size::MiB as f64))
    } else if bytes >= size::KiB {
        format!("{:.2} KiB", (bytes as f64) / (size::KiB as f64))
    } else {
        format!("{bytes} B")
    }
}

// Unit prefixes by increasing magnitude. The position + 1 is the exponent.
const SI_LETTERS: &str = "kmgtpezyrq";
const SI_NAMES: [&str; 10] = [
    "kilo", "mega", "giga", "tera", "peta", "exa", "zetta", "yotta", "ronna", "quetta",
];
const IEC_NAMES: [&str; 10] = [
    "kibi", "mebi", "gibi", "tebi", "pebi", "exbi", "zebi", "yobi", "robi", "quebi",
];

fn unit_multiplier(unit: &str) -> Option<u128> {
    if let Some(name) = unit
        .strip_suffix("bytes")
        .or_else(|| unit.strip_suffix("byte"))
    {
        if name.is_empty() {
            return Some(1);
        }
        if let Some(i) = SI_NAMES.iter().position(|n| *n == name) {
            return Some(1000u128.pow(i as u32 + 1));
        }
        if let Some(i) = IEC_NAMES.iter().position(|n| *n == name) {
            return Some(1024u128.pow(i as u32 + 1));
        }
        return None;
    }

    if unit == "b" {
        return Some(1);
    }

    let mut chars = unit.chars();
    let exp = SI_LETTERS.find(chars.next()?)? as u32 + 1;
    match chars.as_str() {
        "" | "b" => Some(1000u128.pow(exp)),
        "ib" => Some(1024u128.pow(exp)),
        _ => None,
    }
}

/// Parses a byte count such as "1024", "10 GiB", "500mb" or "2 kilobytes".
/// Units are case-insensitive. SI units are powers of 1000 and IEC units are
/// powers of 1024.
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim();
    if let Ok(bytes) = s.parse::<u64>() {
        return Ok(bytes);
    }

    let lower = s.to_lowercase();
    let split = lower
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(lower.len());
    let (number, unit) = lower.split_at(split);

    let number: u128 = number
        .parse()
        .map_err(|_| anyhow!("Invalid size: '{}'", s))?;
    let multiplier =
        unit_multiplier(unit.trim()).ok_or_else(|| anyhow!("Invalid size unit in '{}'", s))?;

    number
        .checked_mul(multiplier)
        .and_then(|bytes| u64::try_from(bytes).ok())
        .ok_or_else(|| anyhow!("Size '{}' is too large", s))
}

/// Parses a duration string (e.g., "1d", "2w", "3m", "4y", "5h", "6s") into a chrono::Duration.
/// Supports combinations like "1d12h", "1d 12h" or "1 d 12 h". A year is 365 days.
pub fn parse_duration_string(s: &str) -> Result<chrono::Duration> {
    let mut total = chrono::Duration::zero();
    let mut number = String::new();
    // Whitespace seen after the digits of the current number
    let mut gap = false;

    for c in s.trim().chars() {
        if c.is_whitespace() {
            gap = !number.is_empty();
            continue;
        }
        if c.is_ascii_digit() {
            if gap {
                bail!("Invalid duration format: {}", s);
            }
            number.push(c);
            continue;
        }
        gap = false;

        let n: i64 = number
            .parse()
            .map_err(|_| anyhow!("Invalid duration format: {}", s))?;
        let part = match c {
            's' => chrono::Duration::try_seconds(n),
            'm' => chrono::Duration::try_minutes(n),
            'h' => chrono::Duration::try_hours(n),
            'd' => chrono::Duration::try_days(n),
            'w' => chrono::Duration::try_weeks(n),
            'y' => n.checked_mul(365).and_then(chrono::Duration::try_days),
            _ => bail!("Invalid duration unit: {}", c),
        };
        total = part
            .and_then(|part| total.checked_add(&part))
            .ok_or_else(|| anyhow!("Duration out of range: {}", s))?;
        number.clear();
    }

    if !number.is_empty() {
        bail!("Invalid duration format: trailing number without unit in {}", s);
    }
    if total.is_zero() && s.trim().is_empty() {
        bail!("Empty duration");
    }

    Ok(total)
}

pub fn format_count<T>(count: T, singular: &str, plural: &str) -> String
where
    T: std::fmt::Display + PartialEq + From<u8>,
{
    if count == T::from(1) {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

pub fn pretty_print_duration(duration: std::time::Duration) -> String {
    let total_seconds = duration.as_secs();
    let milliseconds = duration.subsec_millis();

    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else if seconds > 0 {
        format!("{}.{:03}s", seconds, milliseconds)
    } else {
        format!("{}ms", milliseconds)
    }
}
