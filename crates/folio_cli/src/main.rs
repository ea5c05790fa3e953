//! Folio CLI
//!
//! Replay scripted sessions against a page description and inspect configs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use folio_animation::RecordingEngine;
use folio_core::JsonFileStore;
use folio_page::{DeniedClipboard, Page, PageConfig, Portfolio, RecordingNavigator};

mod session;
mod trace;

use session::PageSpec;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Folio portfolio behavior runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a page's session script and print the trace
    Run {
        /// Page description (TOML)
        page: PathBuf,

        /// Behavior config; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON file backing persistent preferences
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Refuse clipboard writes, as a host without permission would
        #[arg(long)]
        deny_clipboard: bool,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a behavior config
    Check {
        /// Config file
        #[arg(default_value = "folio.toml")]
        config: PathBuf,
    },

    /// Write the default behavior config
    Init {
        /// Output path
        #[arg(default_value = "folio.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            page,
            config,
            store,
            deny_clipboard,
            json,
        } => cmd_run(&page, config.as_deref(), store.as_deref(), deny_clipboard, json),

        Commands::Check { config } => cmd_check(&config),

        Commands::Init { path, force } => cmd_init(&path, force),
    }
}

fn cmd_run(
    page_path: &Path,
    config_path: Option<&Path>,
    store_path: Option<&Path>,
    deny_clipboard: bool,
    json: bool,
) -> Result<()> {
    let spec = PageSpec::load(page_path)?;
    let config = match config_path {
        Some(path) => PageConfig::load(path)?,
        None => PageConfig::default(),
    };
    let tree = spec.build_tree()?;
    info!(
        "Running {} ({} elements, {} steps)",
        page_path.display(),
        spec.elements.len(),
        spec.steps.len()
    );

    let engine = Rc::new(RefCell::new(RecordingEngine::new()));
    let navigator = Rc::new(RefCell::new(RecordingNavigator::new()));
    let mut page = Page::new(tree, config)
        .with_viewport(spec.viewport.width, spec.viewport.height)
        .with_engine(Box::new(engine.clone()))
        .with_navigator(Box::new(navigator.clone()));
    if let Some(path) = store_path {
        page = page.with_store(Box::new(JsonFileStore::open(path)?));
    }
    if deny_clipboard {
        page = page.with_clipboard(Box::new(DeniedClipboard));
    }
    Portfolio::install(&mut page);

    for step in spec.script() {
        step.apply(&mut page)?;
        println!("[{:>6} ms] {}", page.now(), step);
        for call in engine.borrow_mut().take_calls() {
            println!("           {}", trace::describe_call(&call, &page.tree));
        }
    }

    let navigator = navigator.borrow();
    for url in &navigator.opened {
        println!("navigated to {}", url);
    }
    if navigator.reloads > 0 {
        println!("reloaded {} time(s)", navigator.reloads);
    }

    let snapshot = trace::snapshot(&page.tree);
    if json {
        let entries: Vec<serde_json::Value> = snapshot
            .into_iter()
            .map(|(label, mut state)| {
                state["element"] = label.into();
                state
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!();
        println!("Final state (scroll {}):", page.scroll.offset);
        for (label, state) in snapshot {
            println!("  {} {}", label, state);
        }
    }

    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config = PageConfig::load(path)?;
    info!(
        "{} is valid ({} reveal groups)",
        path.display(),
        config.reveal.len()
    );
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    fs::write(path, PageConfig::default().to_toml_string()?)?;
    info!("Wrote default config to {}", path.display());
    Ok(())
}
