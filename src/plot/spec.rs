use serde::{Deserialize, Serialize};

use crate::core::CellValue;
use crate::error::{ChartError, ChartResult};
use crate::plot::GridKey;

/// Declarative chart handed to the rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpecification {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceMode {
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Marker {
    #[must_use]
    pub fn solid(color: &str) -> Self {
        Self {
            color: color.to_owned(),
            size: None,
            symbol: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
}

/// Trace over a 2D cartesian plane (bar, line, area, scatter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartesianTrace {
    pub name: String,
    pub x: Vec<CellValue>,
    pub y: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieMarker {
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieTrace {
    pub name: String,
    pub labels: Vec<CellValue>,
    pub values: Vec<Option<f64>>,
    pub marker: PieMarker,
}

/// Point cloud in 3D space (bar3d, scatter3d).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudTrace {
    pub name: String,
    pub x: Vec<CellValue>,
    pub y: Vec<Option<f64>>,
    pub z: Vec<Option<f64>>,
    pub mode: TraceMode,
    pub marker: Marker,
}

/// Surface over the `y × x` grid; `z[row][col]` pairs with `y[row]`, `x[col]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceTrace {
    pub name: String,
    pub x: Vec<GridKey>,
    pub y: Vec<f64>,
    pub z: Vec<Vec<Option<f64>>>,
    pub colorscale: Vec<(f64, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(CartesianTrace),
    Scatter(CartesianTrace),
    Pie(PieTrace),
    Scatter3d(PointCloudTrace),
    Surface(SurfaceTrace),
}

impl Trace {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Bar(trace) | Self::Scatter(trace) => {
                check_len("x", trace.x.len(), "y", trace.y.len())?;
                check_finite("y", &trace.y)
            }
            Self::Pie(trace) => {
                check_len("labels", trace.labels.len(), "values", trace.values.len())?;
                check_finite("values", &trace.values)
            }
            Self::Scatter3d(trace) => {
                check_len("x", trace.x.len(), "y", trace.y.len())?;
                check_len("x", trace.x.len(), "z", trace.z.len())?;
                check_finite("y", &trace.y)?;
                check_finite("z", &trace.z)
            }
            Self::Surface(trace) => {
                check_len("z rows", trace.z.len(), "y", trace.y.len())?;
                for row in &trace.z {
                    check_len("z columns", row.len(), "x", trace.x.len())?;
                    check_finite("z", row)?;
                }
                Ok(())
            }
        }
    }
}

fn check_len(left: &str, left_len: usize, right: &str, right_len: usize) -> ChartResult<()> {
    if left_len != right_len {
        return Err(ChartError::InvalidData(format!(
            "trace {left} has {left_len} entries but {right} has {right_len}"
        )));
    }
    Ok(())
}

fn check_finite(name: &str, values: &[Option<f64>]) -> ChartResult<()> {
    if values.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ChartError::InvalidData(format!(
            "trace {name} values must be finite"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontLayout {
    pub size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleLayout {
    pub text: String,
    pub font: FontLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub title: TitleLayout,
    pub showgrid: bool,
    pub tickfont: FontLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub font: FontLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub title: TitleLayout,
    pub showlegend: bool,
    pub legend: LegendLayout,
    pub colorway: Vec<String>,
    pub xaxis: AxisLayout,
    pub yaxis: AxisLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zaxis: Option<AxisLayout>,
}

impl PlotSpecification {
    pub fn validate(&self) -> ChartResult<()> {
        if self.traces.is_empty() {
            return Err(ChartError::InvalidData(
                "plot specification has no traces".to_owned(),
            ));
        }
        for trace in &self.traces {
            trace.validate()?;
        }
        Ok(())
    }

    pub fn to_json_value(&self) -> ChartResult<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize plot specification: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize plot specification: {e}"))
        })
    }
}
