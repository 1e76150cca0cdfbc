use std::{io, path::PathBuf, time::Instant};

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use yhlog_cli::{CliError, DeviceChoice, OutputFormat, ReportConfig, ReportPipeline};

#[derive(Parser, Debug)]
#[command(
    name = "yhlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "Decode Yuwell YH-550 / YH-580 CPAP log files",
    long_about = None,
)]
struct Cli {
    /// Файл лога или каталог с файлами
    input: PathBuf,
    /// Модель аппарата: auto, yh550, yh580
    #[arg(short, long, default_value = "auto")]
    device: DeviceChoice,
    /// Формат вывода: text, json, csv
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
    /// Остановиться на первом отклонённом файле
    #[arg(long)]
    fail_fast: bool,
    /// Тихий режим (только ошибки)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Подробный лог декодера
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let config = ReportConfig {
        input: cli.input,
        device: cli.device,
        format: cli.format,
        fail_fast: cli.fail_fast,
    };

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Input         : {}", config.input.display());
    info!("  Device        : {}", config.device);
    info!("  Format        : {}", config.format);
    info!("  Fail fast     : {}", config.fail_fast);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let started = Instant::now();
    let mut pipeline = ReportPipeline::new(config);
    let stdout = io::stdout();

    match pipeline.run(&mut stdout.lock()) {
        Ok(()) => {}
        Err(CliError::Decode { path, .. }) => {
            warn!("--fail-fast: stopped at {}", path.display());
            std::process::exit(1);
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }

    let summary = pipeline.metrics().summary(&started);
    info!("\n{summary}");

    if pipeline.metrics().has_rejections() {
        warn!(
            "⚠ {} file(s) rejected, see errors above",
            pipeline.metrics().files_rejected
        );
        std::process::exit(1);
    }
}
