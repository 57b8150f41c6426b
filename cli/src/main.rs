//! amroute CLI — driving adapter for the amroute routing tree.
//!
//! Subcommands:
//! - `match <config> [--label key=value...] [--trace]` — resolve the policies for a label set
//! - `check <config>` — validate config builds without errors
//! - `tree <config>` — print the resolved routing tree

use std::path::{Path, PathBuf};
use std::process;

use amroute::{LabelSet, Route, RoutingConfig, Routes};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "amroute", version, about = "Resolve alert notification policies from a routing tree")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the notification policies for a label set
    Match {
        /// Routing config (.json, otherwise YAML)
        config: PathBuf,
        /// Alert label, repeatable
        #[arg(short, long = "label", value_name = "KEY=VALUE", value_parser = parse_label)]
        labels: Vec<(String, String)>,
        /// Print the evaluation trace instead of the result
        #[arg(long)]
        trace: bool,
    },
    /// Validate a routing config
    Check {
        /// Routing config (.json, otherwise YAML)
        config: PathBuf,
    },
    /// Print the resolved routing tree
    Tree {
        /// Routing config (.json, otherwise YAML)
        config: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Match {
            config,
            labels,
            trace,
        } => cmd_match(&config, labels, trace),
        Command::Check { config } => cmd_check(&config),
        Command::Tree { config } => cmd_tree(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_match(path: &Path, labels: Vec<(String, String)>, trace: bool) -> Result<(), String> {
    let routes = load_routes(path)?;
    let labels: LabelSet = labels.into_iter().collect();
    tracing::debug!(%labels, "matching");

    if trace {
        println!("{:#?}", routes.matches_with_trace(&labels));
    } else {
        for opts in routes.matches(&labels) {
            println!("{opts}");
        }
    }
    Ok(())
}

fn cmd_check(path: &Path) -> Result<(), String> {
    let routes = load_routes(path)?;
    println!("Config valid ({} top-level routes, depth {})", routes.len(), routes.depth());
    Ok(())
}

fn cmd_tree(path: &Path) -> Result<(), String> {
    let routes = load_routes(path)?;
    print!("{}", render_tree(&routes));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Config loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_config(path: &Path) -> Result<RoutingConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read \"{}\": {e}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        RoutingConfig::from_json(&content)
    } else {
        // Default to YAML (handles .yaml and .yml)
        RoutingConfig::from_yaml(&content)
    };
    config.map_err(|e| e.to_string())
}

fn load_routes(path: &Path) -> Result<Routes, String> {
    load_config(path)?
        .build()
        .map_err(|e| format!("config invalid: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering & argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn render_tree(routes: &Routes) -> String {
    fn walk(route: &Route, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let cont = if route.continue_matching { " continue" } else { "" };
        out.push_str(&format!("{indent}{} {}{cont}\n", route.matchers, route.options));
        for child in &route.routes {
            walk(child, depth + 1, out);
        }
    }

    let mut out = String::new();
    for route in routes {
        walk(route, 0, &mut out);
    }
    out
}

fn parse_label(pair: &str) -> Result<(String, String), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("invalid label \"{pair}\", expected key=value"))?;
    if !amroute::is_valid_label_name(key) {
        return Err(format!("invalid label name \"{key}\""));
    }
    Ok((key.to_owned(), value.to_owned()))
}
