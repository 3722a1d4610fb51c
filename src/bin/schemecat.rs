use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info};

use schemecat::config::Config;
use schemecat::dump::{dump_files, DumpOptions};
use schemecat::utils::init_logger;
use schemecat::version::{full_version, AUTHORS, VERSION};

/// Print files with Scheme comments stripped
#[derive(Parser)]
#[command(version = VERSION, author = AUTHORS)]
struct Args {
    /// Files to print, in order
    files: Vec<PathBuf>,

    /// Print files as-is, without removing comments
    #[arg(short, long)]
    keep_comments: bool,

    /// Don't print the "Output of <file>:" header lines
    #[arg(short = 'H', long)]
    no_headers: bool,

    /// Show configuration paths and the effective configuration
    #[arg(long)]
    show_config: bool,
}

fn main() {
    process::exit(run(Args::parse()))
}

fn run(args: Args) -> i32 {
    if args.show_config {
        Config::help();
        return 0;
    }

    let config = match Config::load() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("FATAL ERROR: Can't load configuration {e}");
            return 501;
        }
    };
    if let Err(e) = init_logger(&config) {
        eprintln!("Can't initialize logger: {e}");
    }
    info!("schemecat {}", full_version());

    if args.files.is_empty() {
        eprintln!("This program requires at least one file name argument.");
        println!("schemecat <name_of_file>...");
        return 0;
    }

    let mut options = DumpOptions::from(&config);
    options.strip_comments &= !args.keep_comments;
    options.headers &= !args.no_headers;

    let stdout = io::stdout();
    let stderr = io::stderr();
    match dump_files(args.files.as_slice(), &options, &mut stdout.lock(), &mut stderr.lock()) {
        Ok(summary) => {
            info!("dumped {} files, skipped {}", summary.dumped, summary.skipped);
            0
        }
        Err(e) => {
            error!("can't write output: {e}");
            eprintln!("FATAL ERROR: {e}");
            502
        }
    }
}
