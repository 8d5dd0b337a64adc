use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{CellValue, Dataset, is_numeric_value};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Number,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub sample: CellValue,
}

/// Sampling rule for column classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceSettings {
    /// Leading rows inspected per column.
    pub sample_size: usize,
    /// A column is numeric when the numeric share of non-empty samples
    /// strictly exceeds this ratio.
    pub numeric_ratio_threshold: f64,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            sample_size: 10,
            numeric_ratio_threshold: 0.7,
        }
    }
}

impl InferenceSettings {
    pub fn validate(self) -> ChartResult<Self> {
        if self.sample_size == 0 {
            return Err(ChartError::InvalidData(
                "inference sample size must be >= 1".to_owned(),
            ));
        }
        if !self.numeric_ratio_threshold.is_finite()
            || !(0.0..1.0).contains(&self.numeric_ratio_threshold)
        {
            return Err(ChartError::InvalidData(
                "numeric ratio threshold must be in [0, 1)".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Classifies one column from its leading rows.
pub fn infer_column_type(
    dataset: &Dataset,
    column: &str,
    settings: InferenceSettings,
) -> ChartResult<ColumnType> {
    let mut total = 0usize;
    let mut numeric = 0usize;
    for value in dataset.column_values(column)?.take(settings.sample_size) {
        if value.is_empty() {
            continue;
        }
        total += 1;
        if is_numeric_value(value) {
            numeric += 1;
        }
    }

    if total > 0 && numeric as f64 / total as f64 > settings.numeric_ratio_threshold {
        Ok(ColumnType::Number)
    } else {
        Ok(ColumnType::Text)
    }
}

/// Describes every column of `dataset`, in schema order.
pub fn describe_columns(
    dataset: &Dataset,
    settings: InferenceSettings,
) -> ChartResult<Vec<ColumnDescriptor>> {
    let mut descriptors = Vec::with_capacity(dataset.column_count());
    for name in dataset.columns() {
        let column_type = infer_column_type(dataset, name, settings)?;
        let sample = dataset
            .column_values(name)?
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_default();
        descriptors.push(ColumnDescriptor {
            name: name.clone(),
            column_type,
            sample,
        });
    }

    debug!(
        columns = descriptors.len(),
        numeric = descriptors
            .iter()
            .filter(|d| d.column_type == ColumnType::Number)
            .count(),
        rows = dataset.row_count(),
        "described dataset columns"
    );
    Ok(descriptors)
}
