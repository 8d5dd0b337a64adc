//! sheet-charts: chart-configuration engine for spreadsheet data.
//!
//! The crate infers column types, walks a user through a guarded chart
//! wizard, compiles the result into a declarative plot specification and
//! persists it in a key/value chart store with an optional remote mirror.

pub mod api;
pub mod core;
pub mod error;
pub mod plot;
pub mod render;
pub mod store;
pub mod telemetry;

pub use api::{ChartConfiguration, ChartEngine, EngineConfig, WizardSession, WizardStep};
pub use error::{ChartError, ChartResult};
