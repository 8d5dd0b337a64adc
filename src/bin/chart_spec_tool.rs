use sheet_charts::api::{ChartConfiguration, EngineConfig};
use sheet_charts::core::{ChartCatalog, Dataset, ThemeCatalog, describe_columns};
use sheet_charts::plot::PlotCompiler;
use sheet_charts::telemetry;
use std::fs;
use std::path::{Path, PathBuf};

const USAGE: &str = "usage: chart_spec_tool <infer|compile> --dataset <path> [--config <path>] [--engine-config <path>] [--output <path>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    Infer,
    Compile,
}

#[derive(Debug)]
struct CliArgs {
    command: CommandKind,
    dataset: PathBuf,
    config: Option<PathBuf>,
    engine_config: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn main() {
    let _ = telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let dataset = Dataset::from_json_str(&read(&args.dataset)?).map_err(|e| e.to_string())?;
    let engine_config = match &args.engine_config {
        Some(path) => EngineConfig::from_json_str(&read(path)?).map_err(|e| e.to_string())?,
        None => EngineConfig::default(),
    };
    let themes = ThemeCatalog::standard();
    let engine_config = engine_config
        .validate(&themes)
        .map_err(|e| e.to_string())?;

    let rendered = match args.command {
        CommandKind::Infer => {
            let columns =
                describe_columns(&dataset, engine_config.inference()).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&columns).map_err(|e| format!("invalid json: {e}"))?
        }
        CommandKind::Compile => {
            let path = args
                .config
                .as_ref()
                .ok_or_else(|| "compile needs --config".to_owned())?;
            let config = ChartConfiguration::from_json_str(&read(path)?).map_err(|e| e.to_string())?;
            let catalog = ChartCatalog::standard();
            let spec = PlotCompiler::new(&catalog, &themes)
                .with_missing_values(engine_config.missing_values)
                .compile(&config, &dataset)
                .map_err(|e| e.to_string())?;
            spec.to_json_pretty().map_err(|e| e.to_string())?
        }
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("failed to read `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let command = match args.next().as_deref() {
        Some("infer") => CommandKind::Infer,
        Some("compile") => CommandKind::Compile,
        _ => return Err(USAGE.to_owned()),
    };

    let mut dataset = None::<PathBuf>;
    let mut config = None::<PathBuf>;
    let mut engine_config = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--dataset" => dataset = Some(value()?),
            "--config" => config = Some(value()?),
            "--engine-config" => engine_config = Some(value()?),
            "--output" => output = Some(value()?),
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown flag `{other}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        command,
        dataset: dataset.ok_or_else(|| "missing --dataset".to_owned())?,
        config,
        engine_config,
        output,
    })
}
