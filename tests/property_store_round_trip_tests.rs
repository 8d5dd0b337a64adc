use proptest::prelude::*;
use sheet_charts::ChartConfiguration;
use sheet_charts::core::{CellValue, ChartKind};
use sheet_charts::store::{ConfigurationStore, MemoryStorage};

fn kind_strategy() -> impl Strategy<Value = ChartKind> {
    proptest::sample::select(ChartKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn create_then_load_returns_the_same_config(
        kind in kind_strategy(),
        title in "[ -~]{0,24}",
        points in proptest::collection::vec(
            ("[a-z]{0,5}", proptest::option::of(-1.0e9f64..1.0e9)),
            0..20,
        ),
        show_legend in any::<bool>(),
    ) {
        let mut config = ChartConfiguration::new(kind)
            .with_axes("x", "y")
            .with_title(title);
        if kind.is_3d() {
            config = config.with_z_axis("z");
            config.z_data = Some(points.iter().map(|(_, v)| v.map(|v| v / 3.0)).collect());
        }
        config.show_legend = show_legend;
        config.x_data = points.iter().map(|(label, _)| CellValue::Text(label.clone())).collect();
        config.y_data = points.iter().map(|(_, v)| *v).collect();
        config.data_points = points.len();

        let mut store = ConfigurationStore::new(MemoryStorage::new());
        let id = store.create(&config).expect("create");
        prop_assert_eq!(store.load(&id).expect("load"), config);
    }
}
