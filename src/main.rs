use std::path::PathBuf;

use clap::Parser;
use log::info;

mod headless;
mod keymap;
mod rom;
mod terminal;

/// CHIP-8 interpreter for the terminal.
///
/// Keys 1234/QWER/ASDF/ZXCV are the hex keys 0 to F. Esc restarts the
/// program, Ctrl-C quits.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run (must not be empty)
    rom: PathBuf,

    /// Seed for the random number generator
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run this many cycles without a terminal, then print the screen
    #[arg(long, value_name = "CYCLES")]
    headless: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let program = rom::load(&args.rom)?;
    info!("running {}", args.rom.display());

    match args.headless {
        Some(cycles) => print!("{}", headless::run(&program, args.seed, cycles)?),
        None => terminal::run(&program, args.seed)?,
    }

    Ok(())
}
