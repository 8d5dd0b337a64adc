pub mod axis_validator;
pub mod coercion;
pub mod column_inference;
pub mod taxonomy;
pub mod theme;
pub mod types;

pub use axis_validator::{Axis, AxisSelection, AxisValidator};
pub use coercion::{
    MissingValuePolicy, coerce_numeric, coerce_with_policy, is_numeric_value, numeric_value,
};
pub use column_inference::{
    ColumnDescriptor, ColumnType, InferenceSettings, describe_columns, infer_column_type,
};
pub use taxonomy::{AxisRequirements, ChartCatalog, ChartKind, ChartKindInfo};
pub use theme::{ColorTheme, DEFAULT_THEME, ThemeCatalog};
pub use types::{CellValue, Dataset};
