//! Pulseboard CLI
//!
//! Command-line front end of the dashboard:
//! - List the registered pages
//! - Render one page as HTML, JSON or a text outline
//! - Navigate interactively in a shell
//! - Prefetch every dataset
//! - Print the default config

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use pulseboard::app::{Dashboard, Opened};
use pulseboard::config::{generate_default_config, Config, SourceKind};
use pulseboard::data::names;
use pulseboard::logging::init_logging;
use pulseboard::pages::PAGES;
use pulseboard::router::{Outcome, RouteState};
use pulseboard::view::{render_html, render_text};

#[derive(Parser)]
#[command(name = "pulseboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Routed analytics dashboard over exported engagement datasets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset directory, overrides the config
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Dataset source (directory, http), overrides the config
    #[arg(long, global = true)]
    pub source: Option<SourceKind>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    Html,
    Json,
    Text,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List dashboard pages
    Routes,

    /// Render one page
    Render {
        /// Route key (empty for home)
        #[arg(default_value = "")]
        route: String,
        #[arg(short, long, value_enum, default_value = "html")]
        format: Format,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Login name (default: from config)
        #[arg(long)]
        username: Option<String>,
        /// Login password (default: from config)
        #[arg(long)]
        password: Option<String>,
    },

    /// Navigate interactively
    Shell,

    /// Load every dataset and report failures
    Prefetch,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data.dir = dir;
    }
    if let Some(source) = cli.source {
        config.data.source = source;
    }
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Routes => {
            for page in &PAGES {
                println!("{:<22} {} {}", page.key, page.icon, page.label);
            }
        }

        Commands::Render {
            route,
            format,
            output,
            username,
            password,
        } => {
            let username = username.unwrap_or_else(|| config.auth.username.clone());
            let password = password.unwrap_or_else(|| config.auth.password.clone());
            let dashboard = Dashboard::from_config(config)?;
            dashboard.login(&username, &password)?;

            let opened = dashboard.open(&route).await?;
            let rendered = match format {
                Format::Html => dashboard.document(&opened.target),
                Format::Json => serde_json::to_string_pretty(&opened_json(&opened))?,
                Format::Text => render_text(&opened.target.content),
            };

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &rendered)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Rendered {} to {:?}", opened.outcome.route(), path);
                }
                None => println!("{}", rendered),
            }

            if let Outcome::Failed { failure, .. } = &opened.outcome {
                bail!("{}", failure);
            }
        }

        Commands::Shell => {
            let dashboard = Dashboard::from_config(config)?;
            shell(&dashboard).await?;
        }

        Commands::Prefetch => {
            let dashboard = Dashboard::from_config(config)?;
            let wanted: Vec<String> = names::ALL.iter().map(|n| n.to_string()).collect();

            let mut failed = 0;
            for (name, result) in dashboard.store().prefetch(&wanted).await {
                match result {
                    Ok(()) => println!("ok      {}", name),
                    Err(e) => {
                        failed += 1;
                        println!("FAILED  {}: {}", name, e);
                    }
                }
            }

            if failed > 0 {
                bail!("{} of {} datasets failed to load", failed, wanted.len());
            }
            println!("All {} datasets loaded from {}", wanted.len(), dashboard.store().describe());
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn opened_json(opened: &Opened) -> serde_json::Value {
    let (status, error) = match &opened.outcome {
        Outcome::Mounted { .. } => ("mounted", None),
        Outcome::Failed { failure, .. } => ("failed", Some(failure.to_string())),
        Outcome::Superseded { .. } => ("superseded", None),
    };
    let charts: Vec<serde_json::Value> = opened
        .target
        .content
        .charts()
        .into_iter()
        .map(|(id, figure)| json!({ "id": id, "figure": figure.to_json() }))
        .collect();

    json!({
        "route": opened.outcome.route(),
        "status": status,
        "error": error,
        "nav": opened.target.nav,
        "charts": charts,
        "html": render_html(&opened.target.content),
    })
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

async fn shell(dashboard: &Dashboard) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(username) = prompt(&mut lines, "Username: ").await? else {
            return Ok(());
        };
        let Some(password) = prompt(&mut lines, "Password: ").await? else {
            return Ok(());
        };
        match dashboard.session().login(&username, &password) {
            Ok(()) => break,
            Err(e) => println!("{}", e),
        }
    }

    let router = dashboard.router();
    let handle = dashboard.spawn_router();
    println!("Commands: <route>, back, forward, reload, routes, quit");

    // The run loop handles the initial location on its own
    let settled = router.wait_settled_after(0).await;
    show(dashboard, &settled.state);

    while let Some(line) = prompt(&mut lines, "> ").await? {
        let epoch = router.epoch();
        let moved = match line.as_str() {
            "" => continue,
            "quit" | "exit" => break,
            "routes" => {
                for route in router.routes() {
                    println!("  {}", route);
                }
                continue;
            }
            "back" => router.back(),
            "forward" => router.forward(),
            "reload" => {
                router.refresh();
                true
            }
            route => router.navigate(route),
        };

        if !moved {
            println!("Nothing to do");
            continue;
        }
        let settled = router.wait_settled_after(epoch).await;
        show(dashboard, &settled.state);
    }

    handle.abort();
    dashboard.logout();
    Ok(())
}

fn show(dashboard: &Dashboard, state: &RouteState) {
    let target = dashboard.router().snapshot();
    let nav: Vec<String> = target
        .nav
        .iter()
        .map(|link| {
            if link.active {
                format!("[{}]", link.key)
            } else {
                link.key.clone()
            }
        })
        .collect();

    println!("{}", nav.join(" "));
    if let Some(route) = state.route() {
        println!("-- {} --", route);
    }
    println!("{}", render_text(&target.content));
}
