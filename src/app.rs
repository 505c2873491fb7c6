//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - resolves the country registry
//! - runs alignment + projection
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{BatchArgs, Cli, Command, ProjectionArgs, ShowArgs};
use crate::domain::{CountryConfig, DisplayMode, RunConfig};
use crate::error::AppError;
use crate::io::export::{figure_path, write_bundle_json, write_figure};
use crate::io::registry::{default_registry, find_country, load_registry};
use crate::render::{AsciiRenderer, RenderAdapter, SvgRenderer};

pub mod pipeline;

use pipeline::CountryRun;

/// Entry point for the `covid` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Show(ref args) => handle_show(&cli, args),
        Command::Batch(ref args) => handle_batch(&cli, args),
        Command::Models => handle_models(&cli),
    }
}

fn init_tracing() {
    // Logs go to stderr so stdout stays clean for reports.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_show(cli: &Cli, args: &ShowArgs) -> Result<(), AppError> {
    let config = run_config(cli, &args.projection, args.plot, args.width, args.height);
    let registry = resolve_registry(&config)?;
    let country = find_country(&registry, &args.country).ok_or_else(|| {
        AppError::new(
            2,
            format!(
                "Unknown country '{}'. Known: {}",
                args.country,
                registry.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
            ),
        )
    })?;

    let run = pipeline::run_country(country, &config.data_dir, &config.modes, config.reference_date)?;
    println!("{}", crate::report::format_country_summary(&run, config.reference_date));

    emit_outputs(&run, &config)
}

fn handle_batch(cli: &Cli, args: &BatchArgs) -> Result<(), AppError> {
    let config = run_config(cli, &args.projection, false, 0, 0);
    let registry = resolve_registry(&config)?;

    let outcome = pipeline::run_batch(&registry, &config.data_dir, &config.modes, config.reference_date);
    println!("{}", crate::report::format_batch_summary(&outcome));

    for run in &outcome.runs {
        // Export problems for one country must not stop the others.
        if let Err(err) = emit_outputs(run, &config) {
            warn!(country = %run.series.country(), error = %err, "export failed");
        }
    }

    if outcome.runs.is_empty() {
        return Err(AppError::new(
            3,
            format!("No country could be aligned from '{}'.", config.data_dir.display()),
        ));
    }
    Ok(())
}

fn handle_models(cli: &Cli) -> Result<(), AppError> {
    let registry = match &cli.registry {
        Some(path) => load_registry(path)?,
        None => default_registry()?,
    };
    print!("{}", crate::report::format_registry(&registry));
    Ok(())
}

pub fn run_config(cli: &Cli, args: &ProjectionArgs, plot: bool, width: usize, height: usize) -> RunConfig {
    let modes = if args.all_modes {
        DisplayMode::ALL.to_vec()
    } else if args.modes.is_empty() {
        vec![DisplayMode::Linear]
    } else {
        args.modes.clone()
    };

    RunConfig {
        data_dir: cli.data.clone(),
        registry_path: cli.registry.clone(),
        modes,
        reference_date: (!args.no_reference_date).then_some(args.reference_date),
        plot,
        plot_width: width,
        plot_height: height,
        export_dir: args.export_dir.clone(),
        svg_dir: args.svg_dir.clone(),
    }
}

fn resolve_registry(config: &RunConfig) -> Result<Vec<CountryConfig>, AppError> {
    match &config.registry_path {
        Some(path) => {
            let registry = load_registry(path)?;
            info!(path = %path.display(), countries = registry.len(), "loaded registry");
            Ok(registry)
        }
        None => Ok(default_registry()?),
    }
}

/// Plots and exports for one country. Rendering only reads the bundles.
fn emit_outputs(run: &CountryRun, config: &RunConfig) -> Result<(), AppError> {
    let country = run.series.country();

    for (mode, bundle) in &run.bundles {
        if config.plot {
            let renderer = AsciiRenderer {
                width: config.plot_width,
                height: config.plot_height,
            };
            match renderer.render(bundle) {
                Ok(plot) => println!("{plot}"),
                Err(err) => warn!(country, mode = mode.slug(), error = %err, "terminal plot failed"),
            }
        }

        if let Some(dir) = &config.export_dir {
            let path = figure_path(dir, country, *mode, "json");
            write_bundle_json(&path, bundle)?;
            info!(country, path = %path.display(), "wrote projection bundle");
        }

        if let Some(dir) = &config.svg_dir {
            let svg = SvgRenderer::default().render(bundle)?;
            let path = figure_path(dir, country, *mode, "svg");
            write_figure(&path, &svg)?;
            info!(country, path = %path.display(), "wrote chart");
        }
    }

    Ok(())
}
