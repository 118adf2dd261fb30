use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use eframe::egui;
use log::{debug, info};

use episcope::app::EpiscopeApp;
use episcope::cli::Args;
use episcope::core::loader::DataSource;
use episcope::widgets::MenuSelection;

fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for log setup)
    let args = Args::parse();

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // Initialize logger based on --log flag
    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| PathBuf::from("episcope.log"));
        let file = std::fs::File::create(&log_path)?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging with specified verbosity level (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .init();
    }

    info!("Episcope episode viewer starting...");
    debug!("Command-line args: {:?}", args);

    let source = match (&args.url, &args.data_dir) {
        (Some(url), _) => DataSource::Http(url.clone()),
        (None, Some(dir)) => DataSource::Dir(dir.clone()),
        (None, None) => anyhow::bail!("either DATA_DIR or --url must be given"),
    };

    let selection = MenuSelection {
        mode: args.mode,
        origin: args.origin,
        ..Default::default()
    };
    let interval = Duration::from_millis(args.interval_ms.max(1));
    let autoplay = args.autoplay;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Episcope v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size(egui::vec2(1100.0, 640.0))
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Episcope",
        native_options,
        Box::new(move |_cc| {
            Ok(Box::new(EpiscopeApp::new(
                source, selection, interval, autoplay,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))?;

    info!("Application exiting");
    Ok(())
}
