// src/main.rs

//! The main entry point for the RAPTOR test server.

use anyhow::Result;
use raptor_server::config::{Config, resolve_directory};
use raptor_server::server;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{filter::EnvFilter, prelude::*};

/// Used when `--config` is not given; a missing file means built-in defaults.
const DEFAULT_CONFIG_PATH: &str = "raptor.toml";

#[tokio::main]
async fn main() -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--version".to_string()) {
        println!("raptor-server version {VERSION}");
        return Ok(());
    }

    let mut config = load_config(&args);

    if let Some(port_str) = flag_value(&args, &["--port"]) {
        match port_str.parse::<u16>() {
            Ok(port) if port != 0 => config.port = port,
            _ => {
                eprintln!("Invalid port number: {port_str}");
                std::process::exit(1);
            }
        }
    }
    if let Some(path) = flag_value(&args, &["-p", "--path"]) {
        config.assignments_path = Some(path.to_string());
    }

    let initial_log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(initial_log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact() // Use the compact, single-line format.
                .with_ansi(true), // Enable ANSI color codes for log levels.
        )
        .init();

    eprintln!("-->To quit press ctrl-c");

    let root = match config.assignments_path.as_deref() {
        Some(path) => resolve_directory(Path::new(path))?,
        None => prompt_for_directory()?,
    };
    println!("path: {}", root.display());
    config.assignments_path = Some(root.to_string_lossy().into_owned());

    if let Err(e) = server::run(config).await {
        error!("Server runtime error: {}", e);
        return Err(e);
    }
    Ok(())
}

/// Loads the config named by `--config`, or the default file when present.
/// Exits the process if the file cannot be used.
fn load_config(args: &[String]) -> Config {
    let (path, explicit) = match flag_value(args, &["--config"]) {
        Some(path) => (path, true),
        None => (DEFAULT_CONFIG_PATH, false),
    };
    if !explicit && !Path::new(path).exists() {
        return Config::default();
    }
    match Config::from_file(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from \"{path}\": {e:#}");
            std::process::exit(1);
        }
    }
}

/// Returns the value following the first of `names` present in `args`.
/// Exits the process if the flag is the last argument.
fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    let index = args.iter().position(|arg| names.contains(&arg.as_str()))?;
    match args.get(index + 1) {
        Some(value) => Some(value.as_str()),
        None => {
            eprintln!("{} flag requires a value", args[index]);
            std::process::exit(1);
        }
    }
}

/// Asks the operator for the assignments directory until an existing one is
/// given. An empty answer selects the current directory.
fn prompt_for_directory() -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!(
            "Please enter the path to the RAPTOR test directory.  Press enter to use the current directory."
        );
        print!("directory [{}]: ", cwd.display());
        io::stdout().flush()?;

        let Some(answer) = lines.next().transpose()? else {
            anyhow::bail!("no assignments directory given");
        };
        let answer = answer.trim();
        let candidate = if answer.is_empty() {
            cwd.clone()
        } else {
            PathBuf::from(answer)
        };
        match resolve_directory(&candidate) {
            Ok(root) => return Ok(root),
            Err(e) => eprintln!("{e:#}"),
        }
    }
}
