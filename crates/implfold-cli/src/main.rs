use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::Verbosity;

mod commands;
mod config;
mod error;
mod io;

use config::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "implfold")]
#[command(about = "Parse implementation signatures and fold generated families", long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Configuration file (defaults to ./implfold.toml when present)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Parse each signature and print its canonical form
    Parse {
        /// File with one signature per line, `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Group signatures and hide every family behind its most general member
    Group {
        /// File with one signature per line, `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output format (overrides the configuration file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Show hidden members under each toggle
        #[arg(short, long)]
        expanded: bool,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = Config::load(args.config.as_deref())?;
    match args.command {
        Command::Parse { file } => commands::parse::handle_parse(&file, &config)?,
        Command::Group {
            file,
            format,
            expanded,
        } => {
            let format = format.unwrap_or(config.output.format);
            commands::group::handle_group(&file, &config, format, expanded)?
        }
    }
    Ok(())
}
