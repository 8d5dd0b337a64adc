use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{ChartConfiguration, EngineConfig, FontStyle};
use crate::core::{
    Axis, AxisValidator, ChartCatalog, ChartKind, ColumnDescriptor, Dataset, MissingValuePolicy,
    ThemeCatalog, describe_columns,
};
use crate::error::{ChartError, ChartResult};
use crate::plot::{PlotCompiler, PlotSpecification};
use crate::store::{ChartId, ConfigurationStore, KeyValueStorage};

/// Ordered wizard steps; movement is one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    SelectData,
    ChooseChart,
    ConfigureAxes,
    StyleTheme,
    Preview,
}

impl WizardStep {
    pub const ALL: [Self; 5] = [
        Self::SelectData,
        Self::ChooseChart,
        Self::ConfigureAxes,
        Self::StyleTheme,
        Self::Preview,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SelectData => "Select Data",
            Self::ChooseChart => "Choose Chart",
            Self::ConfigureAxes => "Configure Axes",
            Self::StyleTheme => "Style & Theme",
            Self::Preview => "Preview",
        }
    }
}

/// Result of compiling the live configuration for display.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Ready(PlotSpecification),
    Unavailable { reason: String },
}

impl PreviewOutcome {
    #[must_use]
    pub fn specification(&self) -> Option<&PlotSpecification> {
        match self {
            Self::Ready(spec) => Some(spec),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Guarded, linear chart configuration workflow over one dataset.
#[derive(Debug, Clone)]
pub struct WizardSession {
    dataset: Dataset,
    columns: Vec<ColumnDescriptor>,
    catalog: Arc<ChartCatalog>,
    themes: Arc<ThemeCatalog>,
    missing_values: MissingValuePolicy,
    file_name: Option<String>,
    step: WizardStep,
    config: ChartConfiguration,
}

impl WizardSession {
    pub fn new(
        dataset: Dataset,
        catalog: Arc<ChartCatalog>,
        themes: Arc<ThemeCatalog>,
        engine_config: &EngineConfig,
    ) -> ChartResult<Self> {
        let columns = describe_columns(&dataset, engine_config.inference())?;
        let config = ChartConfiguration {
            theme: engine_config.default_theme.clone(),
            ..ChartConfiguration::default()
        };
        debug!(
            rows = dataset.row_count(),
            columns = columns.len(),
            "started wizard session"
        );
        Ok(Self {
            dataset,
            columns,
            catalog,
            themes,
            missing_values: engine_config.missing_values,
            file_name: None,
            step: WizardStep::SelectData,
            config,
        })
    }

    /// Records the source file the dataset was parsed from.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfiguration {
        &self.config
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    fn validator(&self) -> AxisValidator<'_> {
        AxisValidator::new(&self.catalog)
    }

    fn compiler(&self) -> PlotCompiler<'_> {
        PlotCompiler::new(&self.catalog, &self.themes).with_missing_values(self.missing_values)
    }

    /// Checks the guard for leaving the current step forwards.
    pub fn check_advance(&self) -> ChartResult<()> {
        let blocked = |reason: &str| ChartError::StepBlocked {
            step: self.step,
            reason: reason.to_owned(),
        };
        match self.step {
            WizardStep::SelectData => {
                if self.dataset.is_empty() {
                    return Err(blocked("dataset has no rows"));
                }
                if self.columns.is_empty() {
                    return Err(blocked("dataset has no columns"));
                }
                Ok(())
            }
            WizardStep::ChooseChart => {
                if self.config.chart_type.is_none() {
                    return Err(blocked("select a chart type"));
                }
                Ok(())
            }
            WizardStep::ConfigureAxes => self
                .validator()
                .validate(self.config.axis_selection())
                .map_err(|err| blocked(&err.to_string())),
            WizardStep::StyleTheme => Ok(()),
            WizardStep::Preview => Err(ChartError::InvalidTransition(
                "preview is the last step".to_owned(),
            )),
        }
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.check_advance().is_ok()
    }

    pub fn advance(&mut self) -> ChartResult<WizardStep> {
        if let Err(err) = self.check_advance() {
            debug!(step = ?self.step, error = %err, "wizard advance refused");
            return Err(err);
        }
        let Some(next) = self.step.next() else {
            return Err(ChartError::InvalidTransition(
                "preview is the last step".to_owned(),
            ));
        };
        debug!(from = ?self.step, to = ?next, "wizard advanced");
        self.step = next;
        Ok(next)
    }

    /// Steps back without any guard; fails only on the first step.
    pub fn back(&mut self) -> ChartResult<WizardStep> {
        let previous = self.step.previous().ok_or_else(|| {
            ChartError::InvalidTransition("already at the first step".to_owned())
        })?;
        debug!(from = ?self.step, to = ?previous, "wizard stepped back");
        self.step = previous;
        Ok(previous)
    }

    /// Switching to a 2D kind drops the Z axis and its style at once.
    pub fn select_chart_kind(&mut self, kind: ChartKind) {
        self.config.chart_type = Some(kind);
        self.config.normalize_dimensions();
    }

    pub fn x_candidates(&self) -> Vec<&ColumnDescriptor> {
        self.validator()
            .x_candidates(&self.columns, self.config.axis_selection())
    }

    pub fn y_candidates(&self) -> Vec<&ColumnDescriptor> {
        self.validator()
            .y_candidates(&self.columns, self.config.axis_selection())
    }

    pub fn z_candidates(&self) -> Vec<&ColumnDescriptor> {
        self.validator()
            .z_candidates(&self.columns, self.config.axis_selection())
    }

    pub fn set_axis(&mut self, axis: Axis, column: &str) -> ChartResult<()> {
        if !self.dataset.has_column(column) {
            return Err(ChartError::UnknownColumn(column.to_owned()));
        }
        if axis == Axis::Z && !self.validator().requires_z(self.config.chart_type) {
            return Err(ChartError::AxisInvalid(
                "the selected chart type has no z axis".to_owned(),
            ));
        }
        self.validator()
            .check_assignment(axis, column, self.config.axis_selection())?;

        let slot = match axis {
            Axis::X => &mut self.config.x_axis,
            Axis::Y => &mut self.config.y_axis,
            Axis::Z => &mut self.config.z_axis,
        };
        *slot = Some(column.to_owned());
        Ok(())
    }

    pub fn clear_axis(&mut self, axis: Axis) {
        match axis {
            Axis::X => self.config.x_axis = None,
            Axis::Y => self.config.y_axis = None,
            Axis::Z => self.config.z_axis = None,
        }
    }

    #[must_use]
    pub fn is_axis_valid(&self) -> bool {
        self.validator().is_axis_valid(self.config.axis_selection())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.config.title = title.into();
    }

    pub fn set_theme(&mut self, theme: &str) -> ChartResult<()> {
        self.themes.require(theme)?;
        self.config.theme = theme.to_owned();
        Ok(())
    }

    pub fn set_show_legend(&mut self, show: bool) {
        self.config.show_legend = show;
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.config.show_grid = show;
    }

    pub fn set_title_style(&mut self, style: FontStyle) {
        self.config.title_style = style;
    }

    pub fn set_legend_style(&mut self, style: FontStyle) {
        self.config.legend_style = style;
    }

    pub fn set_axis_style(&mut self, axis: Axis, style: FontStyle) -> ChartResult<()> {
        match axis {
            Axis::X => self.config.x_axis_style = style,
            Axis::Y => self.config.y_axis_style = style,
            Axis::Z => {
                if !self.config.kind_is_3d() {
                    return Err(ChartError::AxisInvalid(
                        "the selected chart type has no z axis".to_owned(),
                    ));
                }
                self.config.z_axis_style = Some(style);
            }
        }
        Ok(())
    }

    /// Compiles the live configuration; failures degrade to `Unavailable`.
    #[must_use]
    pub fn preview(&self) -> PreviewOutcome {
        match self.compiler().compile(&self.config, &self.dataset) {
            Ok(spec) => PreviewOutcome::Ready(spec),
            Err(err) => {
                warn!(step = ?self.step, error = %err, "preview unavailable");
                PreviewOutcome::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Builds the configuration to persist; only valid on the preview step.
    pub fn finalize(&self) -> ChartResult<ChartConfiguration> {
        if self.step != WizardStep::Preview {
            return Err(ChartError::InvalidTransition(format!(
                "charts can only be created from the preview step, not {:?}",
                self.step
            )));
        }
        self.validator().validate(self.config.axis_selection())?;
        self.compiler()
            .finalize(&self.config, &self.dataset, self.file_name.as_deref())
    }

    /// Finalizes and persists; the session may be dropped afterwards.
    pub fn create<S: KeyValueStorage>(
        &self,
        store: &mut ConfigurationStore<S>,
    ) -> ChartResult<ChartId> {
        let finalized = self.finalize()?;
        store.create(&finalized)
    }
}
