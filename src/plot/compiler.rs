use chrono::Utc;
use tracing::{debug, trace, warn};

use crate::api::{ChartConfiguration, FontStyle};
use crate::core::{
    AxisValidator, CellValue, ChartCatalog, ChartKind, ColorTheme, Dataset, MissingValuePolicy,
    ThemeCatalog, coerce_with_policy, numeric_value,
};
use crate::error::{ChartError, ChartResult};
use crate::plot::{
    AxisLayout, CartesianTrace, FontLayout, Layout, LegendLayout, LineStyle, Marker, PieMarker,
    PieTrace, PlotSpecification, PointCloudTrace, SurfaceTrace, TitleLayout, Trace, TraceMode,
    build_surface_grid,
};

/// Index-aligned series pulled from a dataset for one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    /// Raw X cells; categorical axes keep their labels.
    pub x: Vec<CellValue>,
    pub y: Vec<Option<f64>>,
    pub z: Option<Vec<Option<f64>>>,
    /// Z values that passed numeric recognition, `None` where they did not.
    /// Only the surface grid reads this.
    pub z_recognized: Option<Vec<Option<f64>>>,
}

impl DerivedSeries {
    /// Rebuilds series from the copy persisted inside a configuration.
    ///
    /// Rows the stored recognition mask marks as non-numeric get no
    /// recognized Z. Configurations saved without a mask treat every stored
    /// Z value as recognized.
    #[must_use]
    pub fn from_stored(config: &ChartConfiguration) -> Self {
        let z_recognized = match (&config.z_data, &config.z_recognized) {
            (Some(z), Some(mask)) => Some(
                z.iter()
                    .zip(mask)
                    .map(|(value, recognized)| value.filter(|_| *recognized))
                    .collect(),
            ),
            (z, _) => z.clone(),
        };
        Self {
            x: config.x_data.clone(),
            y: config.y_data.clone(),
            z: config.z_data.clone(),
            z_recognized,
        }
    }

    /// Per-row recognition flags for persisting alongside `z`.
    #[must_use]
    pub fn z_recognition_mask(&self) -> Option<Vec<bool>> {
        self.z_recognized
            .as_ref()
            .map(|z| z.iter().map(Option::is_some).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Turns a chart configuration plus its dataset into a [`PlotSpecification`].
///
/// Compilation is pure: it only scans the inputs and never touches storage,
/// so it can run on every style edit.
#[derive(Debug, Clone, Copy)]
pub struct PlotCompiler<'a> {
    catalog: &'a ChartCatalog,
    themes: &'a ThemeCatalog,
    missing_values: MissingValuePolicy,
}

impl<'a> PlotCompiler<'a> {
    #[must_use]
    pub fn new(catalog: &'a ChartCatalog, themes: &'a ThemeCatalog) -> Self {
        Self {
            catalog,
            themes,
            missing_values: MissingValuePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    pub fn derive_series(
        &self,
        config: &ChartConfiguration,
        dataset: &Dataset,
    ) -> ChartResult<DerivedSeries> {
        let kind = self.check_ready(config)?;
        let x_column = axis_name(config.x_axis.as_deref())?;
        let y_column = axis_name(config.y_axis.as_deref())?;

        let x: Vec<CellValue> = dataset.column_values(x_column)?.cloned().collect();
        let y = dataset
            .column_values(y_column)?
            .map(|value| coerce_with_policy(value, self.missing_values))
            .collect();

        let (z, z_recognized) = if kind.is_3d() {
            let z_column = axis_name(config.z_axis.as_deref())?;
            let raw: Vec<&CellValue> = dataset.column_values(z_column)?.collect();
            let z = raw
                .iter()
                .map(|value| coerce_with_policy(value, self.missing_values))
                .collect();
            let recognized = raw.iter().map(|value| numeric_value(value)).collect();
            (Some(z), Some(recognized))
        } else {
            (None, None)
        };

        Ok(DerivedSeries {
            x,
            y,
            z,
            z_recognized,
        })
    }

    pub fn compile(
        &self,
        config: &ChartConfiguration,
        dataset: &Dataset,
    ) -> ChartResult<PlotSpecification> {
        let series = self.derive_series(config, dataset)?;
        self.compile_series(config, &series)
    }

    /// Compiles from the series already stored in `config`.
    pub fn compile_stored(&self, config: &ChartConfiguration) -> ChartResult<PlotSpecification> {
        self.check_ready(config)?;
        if config.y_data.len() != config.x_data.len() {
            return Err(ChartError::InvalidData(format!(
                "stored series are misaligned: {} x values, {} y values",
                config.x_data.len(),
                config.y_data.len()
            )));
        }
        if let Some(z) = &config.z_data {
            if z.len() != config.x_data.len() {
                return Err(ChartError::InvalidData(format!(
                    "stored series are misaligned: {} x values, {} z values",
                    config.x_data.len(),
                    z.len()
                )));
            }
        }
        if let Some(mask) = &config.z_recognized {
            if mask.len() != config.x_data.len() {
                return Err(ChartError::InvalidData(format!(
                    "stored series are misaligned: {} x values, {} z flags",
                    config.x_data.len(),
                    mask.len()
                )));
            }
        }
        self.compile_series(config, &DerivedSeries::from_stored(config))
    }

    /// Copy of `config` with series and provenance filled in, ready to store.
    pub fn finalize(
        &self,
        config: &ChartConfiguration,
        dataset: &Dataset,
        file_name: Option<&str>,
    ) -> ChartResult<ChartConfiguration> {
        let series = self.derive_series(config, dataset)?;
        let mut finalized = config.clone();
        finalized.z_recognized = series.z_recognition_mask();
        finalized.data_points = series.len();
        finalized.x_data = series.x;
        finalized.y_data = series.y;
        finalized.z_data = series.z;
        if let Some(file_name) = file_name {
            finalized.file_name = Some(file_name.to_owned());
        }
        finalized.created_at.get_or_insert_with(Utc::now);
        finalized.normalize_dimensions();
        Ok(finalized)
    }

    pub fn compile_series(
        &self,
        config: &ChartConfiguration,
        series: &DerivedSeries,
    ) -> ChartResult<PlotSpecification> {
        let kind = self.check_ready(config)?;
        let (theme, known) = self.themes.resolve(&config.theme);
        if !known {
            warn!(
                theme = %config.theme,
                fallback = %theme.name,
                "unknown theme, using fallback palette"
            );
        }

        let name = config.y_axis.clone().unwrap_or_default();
        let trace = match kind {
            ChartKind::Bar => Trace::Bar(CartesianTrace {
                name,
                x: series.x.clone(),
                y: series.y.clone(),
                mode: None,
                fill: None,
                marker: Marker::solid(theme.primary()),
                line: None,
            }),
            ChartKind::Line => Trace::Scatter(CartesianTrace {
                name,
                x: series.x.clone(),
                y: series.y.clone(),
                mode: Some(TraceMode::LinesMarkers),
                fill: None,
                marker: Marker::solid(theme.accent()),
                line: Some(LineStyle {
                    color: theme.primary().to_owned(),
                    width: 2.0,
                }),
            }),
            ChartKind::Area => Trace::Scatter(CartesianTrace {
                name,
                x: series.x.clone(),
                y: series.y.clone(),
                mode: Some(TraceMode::Lines),
                fill: Some("tozeroy".to_owned()),
                marker: Marker::solid(theme.primary()),
                line: Some(LineStyle {
                    color: theme.primary().to_owned(),
                    width: 2.0,
                }),
            }),
            ChartKind::Scatter => Trace::Scatter(CartesianTrace {
                name,
                x: series.x.clone(),
                y: series.y.clone(),
                mode: Some(TraceMode::Markers),
                fill: None,
                marker: Marker {
                    color: theme.primary().to_owned(),
                    size: Some(8.0),
                    symbol: None,
                },
                line: None,
            }),
            ChartKind::Pie => Trace::Pie(PieTrace {
                name,
                labels: series.x.clone(),
                values: series.y.clone(),
                marker: PieMarker {
                    colors: theme.colors.clone(),
                },
            }),
            ChartKind::Bar3d => point_cloud(name, series, theme, 6.0, "square")?,
            ChartKind::Scatter3d => point_cloud(name, series, theme, 4.0, "circle")?,
            ChartKind::Surface3d => {
                let z = series
                    .z_recognized
                    .as_deref()
                    .ok_or_else(|| ChartError::AxisInvalid("missing z series".to_owned()))?;
                let grid = build_surface_grid(&series.x, &series.y, z, self.missing_values.fill());
                trace!(
                    rows = grid.y.len(),
                    columns = grid.x.len(),
                    "built surface grid"
                );
                Trace::Surface(SurfaceTrace {
                    name,
                    x: grid.x,
                    y: grid.y,
                    z: grid.z,
                    colorscale: theme.color_scale(),
                })
            }
        };

        debug!(kind = %kind, points = series.len(), "compiled plot specification");
        Ok(PlotSpecification {
            traces: vec![trace],
            layout: build_layout(config, theme),
        })
    }

    fn check_ready(&self, config: &ChartConfiguration) -> ChartResult<ChartKind> {
        let kind = config
            .chart_type
            .ok_or_else(|| ChartError::AxisInvalid("no chart type selected".to_owned()))?;
        AxisValidator::new(self.catalog).validate(config.axis_selection())?;
        Ok(kind)
    }
}

fn axis_name(axis: Option<&str>) -> ChartResult<&str> {
    axis.ok_or_else(|| ChartError::AxisInvalid("axis column not selected".to_owned()))
}

fn point_cloud(
    name: String,
    series: &DerivedSeries,
    theme: &ColorTheme,
    size: f64,
    symbol: &str,
) -> ChartResult<Trace> {
    let z = series
        .z
        .clone()
        .ok_or_else(|| ChartError::AxisInvalid("missing z series".to_owned()))?;
    Ok(Trace::Scatter3d(PointCloudTrace {
        name,
        x: series.x.clone(),
        y: series.y.clone(),
        z,
        mode: TraceMode::Markers,
        marker: Marker {
            color: theme.primary().to_owned(),
            size: Some(size),
            symbol: Some(symbol.to_owned()),
        },
    }))
}

fn font(style: &FontStyle) -> FontLayout {
    FontLayout {
        size: style.font_size,
        color: style.color.clone(),
    }
}

fn axis_layout(title: Option<&str>, style: &FontStyle, showgrid: bool) -> AxisLayout {
    AxisLayout {
        title: TitleLayout {
            text: title.unwrap_or_default().to_owned(),
            font: font(style),
        },
        showgrid,
        tickfont: font(style),
    }
}

fn build_layout(config: &ChartConfiguration, theme: &ColorTheme) -> Layout {
    let zaxis = if config.kind_is_3d() {
        let style = config
            .z_axis_style
            .clone()
            .unwrap_or_else(FontStyle::axis_default);
        Some(axis_layout(config.z_axis.as_deref(), &style, config.show_grid))
    } else {
        None
    };

    Layout {
        title: TitleLayout {
            text: config.title.clone(),
            font: font(&config.title_style),
        },
        showlegend: config.show_legend,
        legend: LegendLayout {
            font: font(&config.legend_style),
        },
        colorway: theme.colors.clone(),
        xaxis: axis_layout(
            config.x_axis.as_deref(),
            &config.x_axis_style,
            config.show_grid,
        ),
        yaxis: axis_layout(
            config.y_axis.as_deref(),
            &config.y_axis_style,
            config.show_grid,
        ),
        zaxis,
    }
}
