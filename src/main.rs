use clap::{Parser, Subcommand};
use extporter::core::ExtError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "extporter")]
#[command(about = "Convert installed browser extensions between vendor package formats")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List browser profiles and their installed extensions
    List {
        /// Source browser (chrome, firefox)
        #[arg(short, long, default_value = "chrome")]
        browser: String,
        /// Profile number (1-based); lists all profiles when omitted
        #[arg(short, long)]
        profile: Option<usize>,
    },
    /// Convert installed extensions to another browser's package format
    Convert {
        /// Extension ids to convert (interactive selection when omitted)
        ids: Vec<String>,
        /// Convert every extension in the profile
        #[arg(long)]
        all: bool,
        /// Source browser (chrome, firefox)
        #[arg(short, long, default_value = "chrome")]
        browser: String,
        /// Target format (firefox, chrome, edge)
        #[arg(short, long, default_value = "firefox")]
        target: String,
        /// Profile number (1-based)
        #[arg(short, long)]
        profile: Option<usize>,
        /// Output directory (default: ./converted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit placeholder packages for commercial extensions
        #[arg(long)]
        placeholder: bool,
        /// Skip interactive prompts (use defaults)
        #[arg(short, long)]
        yes: bool,
    },
    /// Search the target store for alternatives to an extension
    Alternatives {
        /// Extension name to search for
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), ExtError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List { browser, profile } => cli::list::run(browser, profile),
        Commands::Convert {
            ids,
            all,
            browser,
            target,
            profile,
            output,
            placeholder,
            yes,
        } => cli::convert::run(ids, all, browser, target, profile, output, placeholder, yes).await,
        Commands::Alternatives { name } => cli::alternatives::run(name).await,
    };

    // Display error with helpful suggestions
    if let Err(ref e) = result {
        eprintln!("\n{}", extporter::core::format_error_with_help(e));
    }

    result
}
