mod chart_config;
mod engine;
mod engine_config;
mod wizard;

pub use chart_config::{ChartConfiguration, ChartConfigurationPatch, FontStyle};
pub use engine::ChartEngine;
pub use engine_config::EngineConfig;
pub use wizard::{PreviewOutcome, WizardSession, WizardStep};
