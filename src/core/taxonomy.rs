use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Area,
    Scatter,
    Bar3d,
    Scatter3d,
    Surface3d,
}

impl ChartKind {
    pub const ALL: [Self; 8] = [
        Self::Bar,
        Self::Line,
        Self::Pie,
        Self::Area,
        Self::Scatter,
        Self::Bar3d,
        Self::Scatter3d,
        Self::Surface3d,
    ];

    #[must_use]
    pub fn is_3d(self) -> bool {
        matches!(self, Self::Bar3d | Self::Scatter3d | Self::Surface3d)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Pie => "pie",
            Self::Area => "area",
            Self::Scatter => "scatter",
            Self::Bar3d => "bar3d",
            Self::Scatter3d => "scatter3d",
            Self::Surface3d => "surface3d",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which axes a chart kind needs before it can be compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisRequirements {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartKindInfo {
    pub kind: ChartKind,
    pub name: String,
    pub description: String,
    pub best_for: String,
    pub is_3d: bool,
    pub axes: AxisRequirements,
}

impl ChartKindInfo {
    fn new(kind: ChartKind, name: &str, description: &str, best_for: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            description: description.to_owned(),
            best_for: best_for.to_owned(),
            is_3d: kind.is_3d(),
            axes: AxisRequirements {
                x: true,
                y: true,
                z: kind.is_3d(),
            },
        }
    }
}

/// Immutable lookup table of supported chart kinds.
///
/// Built once and shared by reference; nothing mutates it after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartCatalog {
    entries: IndexMap<ChartKind, ChartKindInfo>,
}

impl Default for ChartCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ChartCatalog {
    #[must_use]
    pub fn standard() -> Self {
        let entries = [
            ChartKindInfo::new(
                ChartKind::Bar,
                "Bar Chart",
                "Compare values across categories",
                "Categorical comparisons",
            ),
            ChartKindInfo::new(
                ChartKind::Line,
                "Line Chart",
                "Show trends over a continuous axis",
                "Time series and trends",
            ),
            ChartKindInfo::new(
                ChartKind::Pie,
                "Pie Chart",
                "Show parts of a whole",
                "Proportions and percentages",
            ),
            ChartKindInfo::new(
                ChartKind::Area,
                "Area Chart",
                "Emphasize magnitude of change over time",
                "Cumulative totals",
            ),
            ChartKindInfo::new(
                ChartKind::Scatter,
                "Scatter Plot",
                "Show the relationship between two variables",
                "Correlation analysis",
            ),
            ChartKindInfo::new(
                ChartKind::Bar3d,
                "3D Bar Chart",
                "Compare values across two dimensions",
                "Multi-dimensional comparisons",
            ),
            ChartKindInfo::new(
                ChartKind::Scatter3d,
                "3D Scatter Plot",
                "Plot points in three-dimensional space",
                "Three-variable relationships",
            ),
            ChartKindInfo::new(
                ChartKind::Surface3d,
                "3D Surface",
                "Render a continuous surface over an x/y grid",
                "Topography and response surfaces",
            ),
        ];
        Self {
            entries: entries.into_iter().map(|info| (info.kind, info)).collect(),
        }
    }

    #[must_use]
    pub fn info(&self, kind: ChartKind) -> Option<&ChartKindInfo> {
        self.entries.get(&kind)
    }

    /// Axis requirements for `kind`, falling back to the kind's own 3D flag
    /// for catalogs that omit it.
    #[must_use]
    pub fn requirements(&self, kind: ChartKind) -> AxisRequirements {
        self.info(kind).map_or(
            AxisRequirements {
                x: true,
                y: true,
                z: kind.is_3d(),
            },
            |info| info.axes,
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChartKindInfo> {
        self.entries.values()
    }

    pub fn kinds_2d(&self) -> impl Iterator<Item = &ChartKindInfo> {
        self.iter().filter(|info| !info.is_3d)
    }

    pub fn kinds_3d(&self) -> impl Iterator<Item = &ChartKindInfo> {
        self.iter().filter(|info| info.is_3d)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
