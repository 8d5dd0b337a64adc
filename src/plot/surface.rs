use std::cmp::Ordering;
use std::collections::BTreeSet;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{CellValue, numeric_value};

/// Distinct raw X value on a surface grid.
///
/// Keys stay as distinct as the raw cells: `"1,200"` and `1200` are separate
/// columns. Ordering is numeric for anything that reads as a number (a native
/// number sorts before an equal formatted string), then plain text, then the
/// blank column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridKey {
    Number(OrderedFloat<f64>),
    Text(String),
    Empty,
}

impl GridKey {
    /// Blank cells (`Empty` or `""`) share the [`GridKey::Empty`] key.
    #[must_use]
    pub fn from_cell(value: &CellValue) -> Self {
        match value {
            _ if value.is_empty() => Self::Empty,
            CellValue::Number(number) => Self::Number(OrderedFloat(*number)),
            CellValue::Text(text) => Self::Text(text.clone()),
            CellValue::Empty => Self::Empty,
        }
    }

    /// Recognized numeric value; only such keys ever receive Z values.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.0.is_finite().then_some(number.0),
            Self::Text(text) => numeric_value(&CellValue::Text(text.clone())),
            Self::Empty => None,
        }
    }

    fn sort_key(&self) -> (u8, OrderedFloat<f64>, u8, &str) {
        match self {
            Self::Number(number) => (0, *number, 0, ""),
            Self::Text(text) => match self.as_number() {
                Some(number) => (0, OrderedFloat(number), 1, text),
                None => (1, OrderedFloat(0.0), 0, text),
            },
            Self::Empty => (2, OrderedFloat(0.0), 0, ""),
        }
    }
}

impl Ord for GridKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for GridKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Z matrix indexed `[y][x]` over the sorted distinct axis values.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    pub x: Vec<GridKey>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<Option<f64>>>,
}

impl SurfaceGrid {
    /// `(rows, columns)`, i.e. `(|unique y|, |unique x|)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.y.len(), self.x.len())
    }

    #[must_use]
    pub fn value_at(&self, x: &GridKey, y: f64) -> Option<Option<f64>> {
        let col = self.x.binary_search(x).ok()?;
        let row = position_of(&self.y, y)?;
        Some(self.z[row][col])
    }
}

/// Builds the surface grid from index-aligned series.
///
/// Every distinct raw X cell (blank included) becomes a column. `z` holds the
/// recognized Z value per row (`None` when the raw cell was not numeric). A
/// row contributes only when its X, Y and Z are all numeric; later rows
/// overwrite earlier ones landing on the same cell. Untouched cells hold
/// `fill`.
#[must_use]
pub fn build_surface_grid(
    x: &[CellValue],
    y: &[Option<f64>],
    z: &[Option<f64>],
    fill: Option<f64>,
) -> SurfaceGrid {
    let unique_x: Vec<GridKey> = x
        .iter()
        .map(GridKey::from_cell)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let unique_y: Vec<f64> = y
        .iter()
        .flatten()
        .map(|v| OrderedFloat(*v))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|v| v.0)
        .collect();

    let mut grid = vec![vec![fill; unique_x.len()]; unique_y.len()];
    for ((x_cell, y_value), z_value) in x.iter().zip(y).zip(z) {
        let key = GridKey::from_cell(x_cell);
        let (Some(_), Some(y_value), Some(z_value)) = (key.as_number(), y_value, z_value) else {
            continue;
        };
        let (Ok(col), Some(row)) = (
            unique_x.binary_search(&key),
            position_of(&unique_y, *y_value),
        ) else {
            continue;
        };
        grid[row][col] = Some(*z_value);
    }

    SurfaceGrid {
        x: unique_x,
        y: unique_y,
        z: grid,
    }
}

fn position_of(sorted: &[f64], value: f64) -> Option<usize> {
    sorted
        .binary_search_by(|candidate| OrderedFloat(*candidate).cmp(&OrderedFloat(value)))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_sort_numbers_then_text_then_blank() {
        let mut keys = vec![
            GridKey::Empty,
            GridKey::Text("b".to_owned()),
            GridKey::Text("1,200".to_owned()),
            GridKey::Number(OrderedFloat(1200.0)),
            GridKey::Text("a".to_owned()),
            GridKey::Number(OrderedFloat(-1.0)),
        ];
        keys.sort();
        assert_eq!(
            keys,
            [
                GridKey::Number(OrderedFloat(-1.0)),
                GridKey::Number(OrderedFloat(1200.0)),
                GridKey::Text("1,200".to_owned()),
                GridKey::Text("a".to_owned()),
                GridKey::Text("b".to_owned()),
                GridKey::Empty,
            ]
        );
    }

    #[test]
    fn formatted_and_plain_numbers_stay_distinct() {
        let formatted = GridKey::from_cell(&CellValue::text("1,200"));
        let plain = GridKey::from_cell(&CellValue::Number(1200.0));
        assert_ne!(formatted, plain);
        assert_eq!(formatted.as_number(), Some(1200.0));
        assert_eq!(GridKey::from_cell(&CellValue::text("")), GridKey::Empty);
        assert_eq!(GridKey::Empty.as_number(), None);
    }
}
