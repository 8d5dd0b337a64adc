use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AxisSelection, CellValue, ChartKind, DEFAULT_THEME};
use crate::error::{ChartError, ChartResult};

/// Font size and colour for one labelled element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    pub font_size: u32,
    pub color: String,
}

impl FontStyle {
    #[must_use]
    pub fn new(font_size: u32, color: impl Into<String>) -> Self {
        Self {
            font_size,
            color: color.into(),
        }
    }

    #[must_use]
    pub fn axis_default() -> Self {
        Self::new(12, "#374151")
    }

    #[must_use]
    pub fn title_default() -> Self {
        Self::new(18, "#111827")
    }
}

/// User selections for one chart, plus the series derived at compile time.
///
/// `z_axis`, `z_axis_style` and `z_data` are only ever populated when the
/// selected kind is 3D; [`ChartConfiguration::normalize_dimensions`]
/// restores that after any mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfiguration {
    pub chart_type: Option<ChartKind>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub z_axis: Option<String>,

    pub title: String,
    pub theme: String,
    pub show_legend: bool,
    pub show_grid: bool,
    pub title_style: FontStyle,
    pub x_axis_style: FontStyle,
    pub y_axis_style: FontStyle,
    pub z_axis_style: Option<FontStyle>,
    pub legend_style: FontStyle,

    #[serde(default)]
    pub x_data: Vec<CellValue>,
    #[serde(default)]
    pub y_data: Vec<Option<f64>>,
    #[serde(default)]
    pub z_data: Option<Vec<Option<f64>>>,
    /// Per-row flag: whether the raw Z cell was a number. Coercion may have
    /// turned unparseable cells into `0` in `z_data`; the surface grid skips
    /// those rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_recognized: Option<Vec<bool>>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data_points: usize,
    #[serde(rename = "is3D", default)]
    pub is_3d: bool,
}

impl Default for ChartConfiguration {
    fn default() -> Self {
        Self {
            chart_type: None,
            x_axis: None,
            y_axis: None,
            z_axis: None,
            title: "Untitled Chart".to_owned(),
            theme: DEFAULT_THEME.to_owned(),
            show_legend: true,
            show_grid: true,
            title_style: FontStyle::title_default(),
            x_axis_style: FontStyle::axis_default(),
            y_axis_style: FontStyle::axis_default(),
            z_axis_style: None,
            legend_style: FontStyle::axis_default(),
            x_data: Vec::new(),
            y_data: Vec::new(),
            z_data: None,
            z_recognized: None,
            file_name: None,
            created_at: None,
            data_points: 0,
            is_3d: false,
        }
    }
}

impl ChartConfiguration {
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        let mut config = Self {
            chart_type: Some(kind),
            ..Self::default()
        };
        config.normalize_dimensions();
        config
    }

    #[must_use]
    pub fn with_axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis = Some(x.into());
        self.y_axis = Some(y.into());
        self
    }

    #[must_use]
    pub fn with_z_axis(mut self, z: impl Into<String>) -> Self {
        self.z_axis = Some(z.into());
        self.normalize_dimensions();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    #[must_use]
    pub fn kind_is_3d(&self) -> bool {
        self.chart_type.is_some_and(ChartKind::is_3d)
    }

    #[must_use]
    pub fn axis_selection(&self) -> AxisSelection<'_> {
        AxisSelection {
            kind: self.chart_type,
            x: self.x_axis.as_deref(),
            y: self.y_axis.as_deref(),
            z: self.z_axis.as_deref(),
        }
    }

    /// Re-establishes the 3D-only field invariant for the current kind.
    pub fn normalize_dimensions(&mut self) {
        self.is_3d = self.kind_is_3d();
        if self.is_3d {
            if self.z_axis_style.is_none() {
                self.z_axis_style = Some(FontStyle::axis_default());
            }
        } else {
            self.z_axis = None;
            self.z_axis_style = None;
            self.z_data = None;
            self.z_recognized = None;
        }
    }

    /// Drops derived series and provenance, keeping only user selections.
    pub fn clear_derived(&mut self) {
        self.x_data.clear();
        self.y_data.clear();
        self.z_data = None;
        self.z_recognized = None;
        self.data_points = 0;
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let mut config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.normalize_dimensions();
        Ok(config)
    }
}

/// Field-level overwrite applied by the chart store's update path.
///
/// `None` leaves the stored field untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfigurationPatch {
    pub chart_type: Option<ChartKind>,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub z_axis: Option<String>,
    pub title: Option<String>,
    pub theme: Option<String>,
    pub show_legend: Option<bool>,
    pub show_grid: Option<bool>,
    pub title_style: Option<FontStyle>,
    pub x_axis_style: Option<FontStyle>,
    pub y_axis_style: Option<FontStyle>,
    pub z_axis_style: Option<FontStyle>,
    pub legend_style: Option<FontStyle>,
    pub x_data: Option<Vec<CellValue>>,
    pub y_data: Option<Vec<Option<f64>>>,
    pub z_data: Option<Vec<Option<f64>>>,
    pub z_recognized: Option<Vec<bool>>,
    pub data_points: Option<usize>,
    pub file_name: Option<String>,
}

impl ChartConfigurationPatch {
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites every field this patch sets, then re-normalizes.
    pub fn apply_to(self, config: &mut ChartConfiguration) {
        macro_rules! overwrite {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    config.$field = value;
                })*
            };
        }
        overwrite!(
            title,
            theme,
            show_legend,
            show_grid,
            title_style,
            x_axis_style,
            y_axis_style,
            legend_style,
            x_data,
            y_data,
            data_points,
        );
        if let Some(kind) = self.chart_type {
            config.chart_type = Some(kind);
        }
        if let Some(x) = self.x_axis {
            config.x_axis = Some(x);
        }
        if let Some(y) = self.y_axis {
            config.y_axis = Some(y);
        }
        if let Some(z) = self.z_axis {
            config.z_axis = Some(z);
        }
        if let Some(style) = self.z_axis_style {
            config.z_axis_style = Some(style);
        }
        if let Some(z_data) = self.z_data {
            config.z_data = Some(z_data);
        }
        if let Some(mask) = self.z_recognized {
            config.z_recognized = Some(mask);
        }
        if let Some(file_name) = self.file_name {
            config.file_name = Some(file_name);
        }
        config.normalize_dimensions();
    }
}
