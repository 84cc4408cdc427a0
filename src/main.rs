use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{io, time::Duration};

mod api;
mod app;
mod config;
mod error;
mod export;
mod metrics;
mod model;
mod notes;
mod ui;

use api::mock::MockProvider;
use api::provider::DataProvider;
use api::spreadsheet::SpreadsheetProvider;
use app::{Action, App};
use chrono::NaiveDate;
use config::Config;
use model::DashboardSnapshot;

#[derive(Parser)]
#[command(name = "hni-dashboard")]
#[command(about = "HNI Client Portfolio Dashboard for the terminal")]
struct Args {
    #[arg(long)]
    generate_config: bool,

    #[arg(short, long)]
    config: Option<String>,

    /// Spreadsheet with Client, Asset Class and Value (INR Lakhs) columns
    #[arg(long)]
    import: Option<String>,

    #[arg(long)]
    client: Option<String>,

    /// Fix the simulation seed so every run shows the same numbers
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    months: Option<usize>,

    /// Write the portfolio report for the selected client and exit
    #[arg(long)]
    export: bool,

    /// Print the dashboard snapshot as JSON and exit
    #[arg(long)]
    json: bool,

    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let headless = args.export || args.json;

    if args.debug || headless {
        let level = if args.debug { log::LevelFilter::Debug } else { log::LevelFilter::Info };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    } else {
        tui_logger::init_logger(log::LevelFilter::Debug)
            .map_err(|e| anyhow::anyhow!("failed to initialise logger: {}", e))?;
        tui_logger::set_default_level(log::LevelFilter::Debug);
    }

    if !args.json {
        print_startup_banner();
    }

    if args.generate_config {
        config::generate_sample_config()?;
        println!("✅ Sample configuration generated at config.toml");
        return Ok(());
    }

    let config_path = args.config.clone().unwrap_or_else(|| "config.toml".to_string());
    let mut config = config::load_config(Some(config_path.as_str()))?;
    apply_overrides(&mut config, &args);
    config::validate_config(&config)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!("🎲 Simulation seed {}", seed);

    if headless {
        run_headless(config, &args, seed)
    } else {
        run_dashboard(config, config_path, args.import, seed, args.debug)
    }
}

pub fn print_startup_banner() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               HNI CLIENT PORTFOLIO DASHBOARD                 ║");
    println!("║                                                              ║");
    println!("║        Asset Allocation | Performance | Simple Analytics     ║");
    println!("║                                                              ║");
    println!("║      Demo data only. Replace with real client data feeds.    ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(months) = args.months {
        config.performance.default_months = config.performance.clamp_months(months);
    }
    if let Some(client) = &args.client {
        config.default_client = Some(client.clone());
    }
    if let Some(path) = &args.import {
        config.data_file = Some(path.clone());
    }
}

/// Loads the configured book and builds the snapshot for the configured
/// client, or the first client in the book when none is set.
fn headless_snapshot(config: &Config, seed: u64, today: NaiveDate) -> Result<DashboardSnapshot> {
    let book = match config.data_file.as_deref() {
        Some(path) => SpreadsheetProvider::new(path).load_book()?,
        None => MockProvider.load_book()?,
    };

    let client = config
        .default_client
        .clone()
        .or_else(|| book.client_names().first().map(|c| c.to_string()))
        .context("no clients to report on")?;

    let snapshot = metrics::build_snapshot(
        &book,
        &client,
        config.performance.default_months,
        seed,
        today,
        config,
    )?;
    Ok(snapshot)
}

fn run_headless(config: Config, args: &Args, seed: u64) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let snapshot = headless_snapshot(&config, seed, today)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    if args.export {
        let path = export::export_report(&config.export_dir, &snapshot, &config.currency_label)?;
        if !args.json {
            println!("✅ Report written to {}", path.display());
        }
    }

    Ok(())
}

fn run_dashboard(
    config: Config,
    config_path: String,
    import_path: Option<String>,
    seed: u64,
    debug_mode: bool,
) -> Result<()> {
    info!("🚀 Starting dashboard (debug: {})", debug_mode);

    let mut app = App::new(config, config_path, import_path, seed);
    app.log_to_tui = !debug_mode;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("👋 Dashboard closed ({} note(s) discarded)", app.notes.len());
    result
}

fn run_ui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let refresh = Duration::from_millis(app.config.ui_settings.refresh_rate_ms);
    let mut render_counter: u64 = 0;

    loop {
        render_counter += 1;
        let today = chrono::Local::now().date_naive();
        let snapshot = app.snapshot(today);

        if render_counter % 100 == 0 {
            debug!(
                "📊 Render #{} - client: {:?}, months: {}, seed: {}",
                render_counter,
                app.selected_client(),
                app.ui.months,
                app.seed
            );
        }

        terminal.draw(|f| ui::dashboard::draw(f, app, &snapshot))?;

        if event::poll(refresh)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key, today) == Action::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
