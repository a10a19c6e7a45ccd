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

use anyhow::Result;
use dialoguer::Confirm;

/// Asks a yes/no question. Defaults to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

#[macro_export]
macro_rules! log_with_level {
    ($min_level:expr, $($arg:tt)*) => {
        if $crate::global::verbosity() >= $min_level {
            println!($($arg)*)
        }
    };
}

#[macro_export]
macro_rules! log_always {
    ($($arg:tt)*) => {
        println!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!(
            "{}{}Error:{} {}",
            "\x1b[1m",  // BOLD
            "\x1b[31m", // RED
            "\x1b[0m",  // RESET
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {
        $crate::ui::cli::log_with_level!(
            1,
            "{}{}Warning:{} {}",
            "\x1b[1m",  // BOLD
            "\x1b[33m", // YELLOW
            "\x1b[0m",  // RESET
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::ui::cli::log_with_level!(1, $($arg)*)
    };
}

#[macro_export]
macro_rules! verbose_1 {
    ($($arg:tt)*) => {
        $crate::ui::cli::log_with_level!(2, $($arg)*)
    };
}

#[macro_export]
macro_rules! verbose_2 {
    ($($arg:tt)*) => {
       $crate::ui::cli::log_with_level!(3, $($arg)*)
    };
}

pub use {error, log, log_always, log_with_level, verbose_1, verbose_2, warning};
