use criterion::{Criterion, criterion_group, criterion_main};
use sheet_charts::api::ChartConfiguration;
use sheet_charts::core::{CellValue, ChartCatalog, ChartKind, Dataset, ThemeCatalog};
use sheet_charts::plot::PlotCompiler;
use std::hint::black_box;

fn sales_dataset(rows: usize) -> Dataset {
    let columns = vec![
        "Region".to_owned(),
        "Units".to_owned(),
        "Revenue".to_owned(),
        "Margin".to_owned(),
    ];
    let rows = (0..rows)
        .map(|i| {
            vec![
                CellValue::text(format!("R{}", i % 50)),
                CellValue::Number((i % 40) as f64),
                CellValue::text(format!("${},{:03}.50", i / 1000 + 1, i % 1000)),
                CellValue::text(format!("{}%", i % 25)),
            ]
        })
        .collect();
    Dataset::new(columns, rows).expect("valid dataset")
}

fn bench_bar_compile_10k(c: &mut Criterion) {
    let catalog = ChartCatalog::standard();
    let themes = ThemeCatalog::standard();
    let compiler = PlotCompiler::new(&catalog, &themes);
    let dataset = sales_dataset(10_000);
    let config = ChartConfiguration::new(ChartKind::Bar).with_axes("Region", "Revenue");

    c.bench_function("bar_compile_10k", |b| {
        b.iter(|| {
            let _ = compiler
                .compile(black_box(&config), black_box(&dataset))
                .expect("compile should succeed");
        })
    });
}

fn bench_surface_compile_10k(c: &mut Criterion) {
    let catalog = ChartCatalog::standard();
    let themes = ThemeCatalog::standard();
    let compiler = PlotCompiler::new(&catalog, &themes);
    let dataset = sales_dataset(10_000);
    let config = ChartConfiguration::new(ChartKind::Surface3d)
        .with_axes("Units", "Margin")
        .with_z_axis("Revenue");

    c.bench_function("surface_compile_10k", |b| {
        b.iter(|| {
            let _ = compiler
                .compile(black_box(&config), black_box(&dataset))
                .expect("compile should succeed");
        })
    });
}

criterion_group!(benches, bench_bar_compile_10k, bench_surface_compile_10k);
criterion_main!(benches);
