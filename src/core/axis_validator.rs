use crate::core::{ChartCatalog, ChartKind, ColumnDescriptor, ColumnType};
use crate::error::{ChartError, ChartResult};

/// Borrowed view of the axis-related fields of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSelection<'a> {
    pub kind: Option<ChartKind>,
    pub x: Option<&'a str>,
    pub y: Option<&'a str>,
    pub z: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

/// Applies the per-kind axis rules of a [`ChartCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct AxisValidator<'a> {
    catalog: &'a ChartCatalog,
}

impl<'a> AxisValidator<'a> {
    #[must_use]
    pub fn new(catalog: &'a ChartCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn requires_z(&self, kind: Option<ChartKind>) -> bool {
        kind.is_some_and(|kind| self.catalog.requirements(kind).z)
    }

    /// Any column may be X unless it is already Y or Z.
    #[must_use]
    pub fn x_candidates<'c>(
        &self,
        columns: &'c [ColumnDescriptor],
        selection: AxisSelection<'_>,
    ) -> Vec<&'c ColumnDescriptor> {
        columns
            .iter()
            .filter(|c| Some(c.name.as_str()) != selection.y)
            .filter(|c| Some(c.name.as_str()) != selection.z)
            .collect()
    }

    /// Numeric columns not used as X or Z; every remaining column when none
    /// of them is numeric.
    #[must_use]
    pub fn y_candidates<'c>(
        &self,
        columns: &'c [ColumnDescriptor],
        selection: AxisSelection<'_>,
    ) -> Vec<&'c ColumnDescriptor> {
        prefer_numeric(columns, [selection.x, selection.z])
    }

    /// Same rule as Y, excluding X and Y. Empty for 2D kinds.
    #[must_use]
    pub fn z_candidates<'c>(
        &self,
        columns: &'c [ColumnDescriptor],
        selection: AxisSelection<'_>,
    ) -> Vec<&'c ColumnDescriptor> {
        if !self.requires_z(selection.kind) {
            return Vec::new();
        }
        prefer_numeric(columns, [selection.x, selection.y])
    }

    /// Rejects `column` for `axis` when another axis already holds it.
    pub fn check_assignment(
        &self,
        axis: Axis,
        column: &str,
        selection: AxisSelection<'_>,
    ) -> ChartResult<()> {
        let others = match axis {
            Axis::X => [(Axis::Y, selection.y), (Axis::Z, selection.z)],
            Axis::Y => [(Axis::X, selection.x), (Axis::Z, selection.z)],
            Axis::Z => [(Axis::X, selection.x), (Axis::Y, selection.y)],
        };
        for (other, taken) in others {
            if taken == Some(column) {
                return Err(ChartError::AxisConflict {
                    column: column.to_owned(),
                    taken_by: other.label(),
                });
            }
        }
        Ok(())
    }

    /// X and Y set, plus Z whenever the kind is 3D.
    #[must_use]
    pub fn is_axis_valid(&self, selection: AxisSelection<'_>) -> bool {
        self.validate(selection).is_ok()
    }

    pub fn validate(&self, selection: AxisSelection<'_>) -> ChartResult<()> {
        let mut missing = Vec::new();
        if selection.x.is_none() {
            missing.push("x");
        }
        if selection.y.is_none() {
            missing.push("y");
        }
        if self.requires_z(selection.kind) && selection.z.is_none() {
            missing.push("z");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ChartError::AxisInvalid(format!(
                "missing {} axis",
                missing.join(", ")
            )))
        }
    }
}

fn prefer_numeric<'c>(
    columns: &'c [ColumnDescriptor],
    excluded: [Option<&str>; 2],
) -> Vec<&'c ColumnDescriptor> {
    let remaining: Vec<&ColumnDescriptor> = columns
        .iter()
        .filter(|c| !excluded.contains(&Some(c.name.as_str())))
        .collect();
    let numeric: Vec<&ColumnDescriptor> = remaining
        .iter()
        .copied()
        .filter(|c| c.column_type == ColumnType::Number)
        .collect();
    if numeric.is_empty() { remaining } else { numeric }
}
