use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use marknote::cli::{self, CliArgs};
use marknote::config::EditorConfig;

fn main() -> Result<()> {
    marknote::tracing::init();

    let args = CliArgs::parse();
    let config = EditorConfig::load();
    tracing::debug!(?args, "starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    cli::run(args, &config, &mut out)?;
    out.flush()?;
    Ok(())
}
