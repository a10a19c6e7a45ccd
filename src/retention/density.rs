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

use super::{Result, RetentionError};

/// Yields items in order of geometric redundancy, the most redundant first.
///
/// Items are sorted by their key. On every step the adjacent pair with the
/// smallest `bigger / smaller` ratio is located (the leftmost one on ties) and
/// its smaller item is removed and yielded. Ratios are recomputed after each
/// removal, so the survivors end up roughly geometrically spaced.
///
/// The selector stops when a single item is left. That item is never yielded
/// and can be recovered with [`DensitySelector::into_remaining`].
///
/// ```text
/// keys: 1    3 4        10                  25
///       |----|-|---------|-------------------|
///             ^ 4/3 is the smallest ratio, so 3 goes first
///
/// yields 3, 4, 10, 1 and leaves 25
/// ```
pub struct DensitySelector<T> {
    items: Vec<(T, f64)>,
}

impl<T> DensitySelector<T> {
    /// Creates a selector over `(item, key)` pairs. Every key must be finite
    /// and strictly positive.
    pub fn new(items: impl IntoIterator<Item = (T, f64)>) -> Result<Self> {
        let mut items: Vec<(T, f64)> = items.into_iter().collect();

        if let Some((_, key)) = items
            .iter()
            .find(|(_, key)| !(key.is_finite() && *key > 0.0))
        {
            return Err(RetentionError::InvalidInput(format!(
                "density keys must be finite and positive, found {key}"
            )));
        }

        // Stable, so equal keys keep their input order
        items.sort_by(|a, b| a.1.total_cmp(&b.1));

        Ok(Self { items })
    }

    /// Items not yielded yet, sorted by key.
    pub fn remaining(&self) -> &[(T, f64)] {
        &self.items
    }

    /// Consumes the selector and returns the items not yielded yet.
    pub fn into_remaining(self) -> Vec<(T, f64)> {
        self.items
    }

    /// Index of the left item of the pair with the smallest ratio.
    fn densest_pair(&self) -> Option<usize> {
        let mut densest: Option<(usize, f64)> = None;

        for (i, pair) in self.items.windows(2).enumerate() {
            let ratio = pair[1].1 / pair[0].1;
            match densest {
                Some((_, min_ratio)) if min_ratio <= ratio => {}
                _ => densest = Some((i, ratio)),
            }
        }

        densest.map(|(i, _)| i)
    }
}

impl<T> Iterator for DensitySelector<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.densest_pair()?;
        Some(self.items.remove(idx).0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.items.len().saturating_sub(1);
        (n, Some(n))
    }
}
