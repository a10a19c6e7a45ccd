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

/// Length of a string as shown in a terminal, ignoring ANSI escape codes.
fn visible_len(s: &str) -> usize {
    let mut len = 0;
    let mut in_escape = false;

    for c in s.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            len += 1;
        }
    }
    len
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Alignment {
    Left,
    Right,
}

/// A plain text table with aligned columns.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    alignments: Vec<Alignment>,
}

impl Table {
    /// Creates a table. Columns without an alignment are left-aligned.
    pub fn new_with_alignments(alignments: Vec<Alignment>) -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
            alignments,
        }
    }

    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();

        for row in std::iter::once(&self.headers).chain(self.rows.iter()) {
            if row.len() > widths.len() {
                widths.resize(row.len(), 0);
            }
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(visible_len(cell));
            }
        }
        widths
    }

    fn render_row(&self, row: &[String], widths: &[usize], output: &mut String) {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let padding = " ".repeat(widths[i] - visible_len(cell));
                match self.alignments.get(i).copied().unwrap_or(Alignment::Left) {
                    Alignment::Left => format!("{cell}{padding}"),
                    Alignment::Right => format!("{padding}{cell}"),
                }
            })
            .collect();

        output.push_str(cells.join("  ").trim_end());
        output.push('\n');
    }

    /// Renders the table to a String.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let line_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        let line = format!("{}\n", "-".repeat(line_width));

        let mut output = String::new();
        if widths.is_empty() {
            return output;
        }

        if !self.headers.is_empty() {
            self.render_row(&self.headers, &widths, &mut output);
            output.push_str(&line);
        }
        for row in &self.rows {
            self.render_row(row, &widths, &mut output);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use colored::Colorize;

    use super::*;

    #[test]
    fn test_visible_len_ignores_colors() {
        assert_eq!(visible_len("keep"), 4);
        assert_eq!(visible_len("\x1b[1;32mkeep\x1b[0m"), 4);
        assert_eq!(visible_len(&"delete".red().bold().to_string()), 6);
    }

    #[test]
    fn test_render() {
        let mut table = Table::new_with_alignments(vec![Alignment::Left, Alignment::Right]);
        table.set_headers(vec!["Path".to_string(), "Size".to_string()]);
        table.add_row(vec!["a".to_string(), "10 B".to_string()]);
        table.add_row(vec!["backup-2".to_string(), "1.00 KiB".to_string()]);

        let expected = "\
Path          Size
------------------
a             10 B
backup-2  1.00 KiB
";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_render_empty_table() {
        let table = Table::new_with_alignments(Vec::new());
        assert_eq!(table.render(), "");
    }
}
