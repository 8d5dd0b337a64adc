use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// One raw spreadsheet cell as handed over by the parsing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Empty cells and zero-length strings carry no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn from_json(value: &Value) -> ChartResult<Self> {
        match value {
            Value::Null => Ok(Self::Empty),
            Value::Bool(flag) => Ok(Self::Text(flag.to_string())),
            Value::Number(number) => number.as_f64().map(Self::Number).ok_or_else(|| {
                ChartError::InvalidData(format!("cell number `{number}` is not representable"))
            }),
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Array(_) | Value::Object(_) => Err(ChartError::InvalidData(
                "cell values must be scalars".to_owned(),
            )),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Row-major table with a schema fixed at construction time.
///
/// Column names come from the first record and never change afterwards;
/// every row holds exactly one cell per column, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> ChartResult<Self> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(ChartError::InvalidData(format!(
                    "duplicate column name `{name}`"
                )));
            }
        }
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(ChartError::InvalidData(format!(
                "row {index} has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Builds a dataset from keyed records.
    ///
    /// The schema is taken from the first record. Keys a later record lacks
    /// become `Empty`; keys the first record lacked are ignored.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = IndexMap<String, CellValue>>,
    {
        let mut records = records.into_iter();
        let Some(first) = records.next() else {
            return Self::default();
        };

        let columns: Vec<String> = first.keys().cloned().collect();
        let mut rows = vec![first.into_values().collect::<Vec<_>>()];
        for mut record in records {
            rows.push(
                columns
                    .iter()
                    .map(|name| record.shift_remove(name).unwrap_or_default())
                    .collect(),
            );
        }
        Self { columns, rows }
    }

    /// Parses a JSON array of flat objects.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let parsed: Value = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse dataset: {e}")))?;
        let Value::Array(items) = parsed else {
            return Err(ChartError::InvalidData(
                "dataset must be a JSON array of records".to_owned(),
            ));
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Value::Object(fields) = item else {
                return Err(ChartError::InvalidData(format!(
                    "dataset record {index} is not an object"
                )));
            };
            let mut record = IndexMap::with_capacity(fields.len());
            for (name, value) in fields {
                record.insert(name.clone(), CellValue::from_json(value)?);
            }
            records.push(record);
        }
        Ok(Self::from_records(records))
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column in row order.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> ChartResult<impl Iterator<Item = &'a CellValue> + use<'a>> {
        let index = self
            .column_index(name)
            .ok_or_else(|| ChartError::UnknownColumn(name.to_owned()))?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }

    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[index])
    }
}
