mod calc;
mod cmd;
mod data;
mod ui;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rangecal", about = "pick a date range from a scrolling month grid")]
struct Cli {
    /// Path to the directory containing config.yaml (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml into the data directory
    Init,
    /// Print the month grids to stdout instead of starting the picker
    Show {
        /// Number of months to print (default: months_shown from config)
        #[arg(long)]
        months: Option<u32>,
        /// Range start, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Range end, YYYY-MM-DD (requires --from)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Reference date standing in for today, YYYY-MM-DD
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir);

    match cli.command {
        None => cmd::root::run(),
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Show {
            months,
            from,
            to,
            today,
            json,
        }) => cmd::show::run(months, from, to, today, json),
    }
}
