//! Writes the stacklist man page to stdout, or to the path given as the first argument.

use clap::CommandFactory;
use stacklist::cli::Cli;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let man = clap_mangen::Man::new(Cli::command());
    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer)?;

    match std::env::args().nth(1) {
        Some(path) => {
            std::fs::write(&path, &buffer)?;
            log::info!("Wrote man page to {}", path);
        }
        None => std::io::stdout().write_all(&buffer)?,
    }
    Ok(())
}
