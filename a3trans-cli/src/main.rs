use std::path::PathBuf;

use a3trans::WorkDir;
use a3trans_cli::{
    Config,
    dump::run_dump_command,
    export::{ExportOptions, run_export_command},
    extract::{ExtractOptions, run_extract_command},
    import::{ImportOptions, run_import_command},
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Working directory; the current directory when omitted
    #[arg(short, long, global = true)]
    directory: Option<PathBuf>,

    /// Print debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract translation strings from the scripts into stringtable.xml.
    Extract {
        /// Back up the current stringtable.xml before writing
        #[arg(short, long)]
        backup: bool,
    },

    /// Convert stringtable.xml into XLIFF files in the l10n directory.
    Export {
        /// XLIFF version to write (1 or 2)
        #[arg(short = 'x', long)]
        xliff_version: Option<String>,

        /// ISO 639-1 code of the source language (default: en)
        #[arg(short, long)]
        source_lang: Option<String>,

        /// Only write the language independent strings.xlf
        #[arg(long)]
        source_only: bool,

        /// Target languages to write, all supported languages when omitted
        #[arg(short = 'l', long = "lang", value_delimiter = ',')]
        langs: Vec<String>,
    },

    /// Convert the XLIFF files in the l10n directory into stringtable.xml.
    Import {
        /// Back up the current stringtable.xml before writing
        #[arg(short, long)]
        backup: bool,
    },

    /// Print stringtable.xml as JSON.
    Dump {
        /// Write the JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let root = args.directory.unwrap_or_else(|| PathBuf::from("."));
    if !root.is_dir() {
        eprintln!("Error: {} is not a directory", root.display());
        std::process::exit(1);
    }
    tracing::info!("working directory: {}", root.display());
    let workdir = WorkDir::new(root);

    let config = match Config::load(workdir.root()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let quiet = args.quiet;
    let result = match args.commands {
        Commands::Extract { backup } => {
            run_extract_command(&workdir, &config, ExtractOptions { backup, quiet })
        }
        Commands::Export {
            xliff_version,
            source_lang,
            source_only,
            langs,
        } => run_export_command(
            &workdir,
            &config,
            ExportOptions {
                xliff_version,
                source_lang,
                source_only,
                langs,
                quiet,
            },
        ),
        Commands::Import { backup } => {
            run_import_command(&workdir, &config, ImportOptions { backup, quiet })
        }
        Commands::Dump { output } => run_dump_command(&workdir, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
