use std::collections::BTreeSet;

use proptest::prelude::*;
use sheet_charts::core::CellValue;
use sheet_charts::plot::build_surface_grid;

proptest! {
    #[test]
    fn grid_shape_matches_distinct_axis_values(
        rows in proptest::collection::vec((0i32..6, 0i32..5, -50i32..50), 1..60)
    ) {
        let x: Vec<CellValue> = rows.iter().map(|r| CellValue::Number(f64::from(r.0))).collect();
        let y: Vec<Option<f64>> = rows.iter().map(|r| Some(f64::from(r.1))).collect();
        let z: Vec<Option<f64>> = rows.iter().map(|r| Some(f64::from(r.2))).collect();

        let grid = build_surface_grid(&x, &y, &z, Some(0.0));
        let distinct_x: BTreeSet<i32> = rows.iter().map(|r| r.0).collect();
        let distinct_y: BTreeSet<i32> = rows.iter().map(|r| r.1).collect();

        prop_assert_eq!(grid.shape(), (distinct_y.len(), distinct_x.len()));
        prop_assert!(grid.z.iter().all(|row| row.len() == distinct_x.len()));
        prop_assert!(grid.y.windows(2).all(|pair| pair[0] < pair[1]));

        // The last row written to each cell wins.
        for (xi, yi, _) in &rows {
            let last = rows
                .iter()
                .rev()
                .find(|r| r.0 == *xi && r.1 == *yi)
                .map(|r| f64::from(r.2));
            let col = distinct_x.iter().position(|v| v == xi).expect("x present");
            let row = distinct_y.iter().position(|v| v == yi).expect("y present");
            prop_assert_eq!(grid.z[row][col], last);
        }
    }
}
