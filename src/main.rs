#![deny(unsafe_code)]
pub mod commands;
mod version;

use anyhow::Result;
use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use commands::command::Command;
use commands::falcon::Falcon;
use commands::m4::M4;
use enum_dispatch::enum_dispatch;
use env_logger::Env;
use log::info;

/// Custom styles for CLI help output
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(styles = STYLES)]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

#[enum_dispatch(Command)]
#[derive(Parser, Debug)]
#[command(version)]
enum Subcommand {
    #[command(display_order = 1)]
    Falcon(Falcon),
    #[command(display_order = 2)]
    M4(M4),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let command_line = std::env::args().collect::<Vec<_>>().join(" ");
    let args = Args::parse();

    info!("Running fgovl version {}", version::VERSION.as_str());
    args.subcommand.execute(&command_line)
}
