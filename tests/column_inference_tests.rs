use sheet_charts::ChartError;
use sheet_charts::core::{
    CellValue, ColumnType, Dataset, InferenceSettings, describe_columns, infer_column_type,
};

fn single_column(values: Vec<CellValue>) -> Dataset {
    Dataset::new(
        vec!["c".to_owned()],
        values.into_iter().map(|value| vec![value]).collect(),
    )
    .expect("dataset")
}

fn monthly_revenue() -> Dataset {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let rows = MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            vec![
                CellValue::text(*month),
                CellValue::text(format!("${},{}00", i + 1, i)),
            ]
        })
        .collect();
    Dataset::new(vec!["Month".to_owned(), "Revenue".to_owned()], rows).expect("dataset")
}

#[test]
fn month_and_revenue_columns_are_classified() {
    let columns = describe_columns(&monthly_revenue(), InferenceSettings::default())
        .expect("describe");

    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].name, "Month");
    assert_eq!(columns[0].column_type, ColumnType::Text);
    assert_eq!(columns[0].sample, CellValue::text("Jan"));
    assert_eq!(columns[1].name, "Revenue");
    assert_eq!(columns[1].column_type, ColumnType::Number);
    assert_eq!(columns[1].sample, CellValue::text("$1,000"));
}

#[test]
fn exactly_seventy_percent_numeric_is_text() {
    let mut values: Vec<CellValue> = (0..7).map(|i| CellValue::Number(i as f64)).collect();
    values.extend((0..3).map(|_| CellValue::text("x")));
    let kind = infer_column_type(&single_column(values), "c", InferenceSettings::default())
        .expect("infer");
    assert_eq!(kind, ColumnType::Text);
}

#[test]
fn eighty_percent_numeric_is_number() {
    let mut values: Vec<CellValue> = (0..8).map(|i| CellValue::Number(i as f64)).collect();
    values.extend((0..2).map(|_| CellValue::text("x")));
    let kind = infer_column_type(&single_column(values), "c", InferenceSettings::default())
        .expect("infer");
    assert_eq!(kind, ColumnType::Number);
}

#[test]
fn only_leading_rows_are_sampled() {
    let mut values: Vec<CellValue> = (0..10).map(|_| CellValue::text("label")).collect();
    values.extend((0..50).map(|i| CellValue::Number(i as f64)));
    let kind = infer_column_type(&single_column(values), "c", InferenceSettings::default())
        .expect("infer");
    assert_eq!(kind, ColumnType::Text);
}

#[test]
fn empty_cells_do_not_count_against_numeric_share() {
    let mut values = vec![CellValue::Number(1.0), CellValue::text("2"), CellValue::text("3")];
    values.extend((0..7).map(|_| CellValue::Empty));
    let kind = infer_column_type(&single_column(values), "c", InferenceSettings::default())
        .expect("infer");
    assert_eq!(kind, ColumnType::Number);
}

#[test]
fn all_empty_column_is_text_with_empty_sample() {
    let dataset = single_column(vec![CellValue::Empty, CellValue::text("")]);
    let columns = describe_columns(&dataset, InferenceSettings::default()).expect("describe");
    assert_eq!(columns[0].column_type, ColumnType::Text);
    assert_eq!(columns[0].sample, CellValue::Empty);
}

#[test]
fn unknown_column_is_reported() {
    let result = infer_column_type(&monthly_revenue(), "Profit", InferenceSettings::default());
    assert!(matches!(result, Err(ChartError::UnknownColumn(name)) if name == "Profit"));
}

#[test]
fn settings_are_validated() {
    let zero_sample = InferenceSettings {
        sample_size: 0,
        ..InferenceSettings::default()
    };
    assert!(zero_sample.validate().is_err());

    let bad_ratio = InferenceSettings {
        numeric_ratio_threshold: 1.0,
        ..InferenceSettings::default()
    };
    assert!(bad_ratio.validate().is_err());
    assert!(InferenceSettings::default().validate().is_ok());
}
