#![deny(warnings)]

//! Terminal front end for the city builder.

mod form;
mod render;
mod shell;

use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use city_runtime::{Session, SessionConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::shell::Shell;

#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    version: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(it.next().context("--config needs a path")?.into()),
            "--seed" => {
                let raw = it.next().context("--seed needs a value")?;
                let seed = raw
                    .parse()
                    .with_context(|| format!("invalid seed '{raw}'"))?;
                parsed.seed = Some(seed);
            }
            "--version" => parsed.version = true,
            other => bail!("unknown argument '{other}' (expected --config, --seed or --version)"),
        }
    }
    Ok(parsed)
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let config = match &args.config {
        Some(path) => SessionConfig::from_yaml_file(path)?,
        None => SessionConfig::default(),
    };
    Ok(match args.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the menu on stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    if args.version {
        println!(
            "city {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            env!("BUILD_DATE")
        );
        return Ok(());
    }

    let config = load_config(&args)?;
    let session = Session::new(&config);
    info!(seed = session.seed(), "starting shell");

    let mut shell = Shell::new(session, io::stdin().lock(), io::stdout());
    let end = shell.run()?;
    let (session, _) = shell.into_parts();
    info!(
        ?end,
        budget = %session.budget(),
        structures = session.structures().len(),
        actions = session.journal().len(),
        "session closed"
    );
    Ok(())
}
