use arpa_core::collector::OrderStats;
use arpa_core::{ReaderConfig, WordIndexer};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read an ARPA n-gram language model and summarise it", long_about = None, name = "arpa")]
struct CliArgs {
    #[arg(short, long, value_name = "FILE", help = "Model file (.arpa or .arpa.gz); reads stdin if omitted")]
    input: Option<PathBuf>,

    #[arg(
        long,
        value_name = "N",
        help = "Highest n-gram order to read (default: all orders)"
    )]
    max_order: Option<usize>,

    #[arg(long, help = "Memory-map the input file instead of buffering it")]
    mmap: bool,

    #[arg(short, long, conflicts_with = "quiet", help = "Log progress to stderr")]
    verbose: bool,

    #[arg(short, long, help = "Suppress all logging")]
    quiet: bool,
}

fn init_tracing(args: &CliArgs) {
    // --quiet wins, --verbose shows info, otherwise RUST_LOG or warnings only.
    let filter = if args.quiet {
        EnvFilter::new("off")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli_args = CliArgs::parse();
    init_tracing(&cli_args);

    if let Err(e) = run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli_args: CliArgs) -> arpa_core::Result<()> {
    let config = ReaderConfig::new_from_cli(cli_args.input, cli_args.max_order, cli_args.mmap)?;
    debug!(?config, "Reader configured");

    let mut stats = OrderStats::new();
    let vocabulary = arpa_core::load_arpa(&config, &mut stats)?;

    for order in stats.orders() {
        let declared = order
            .declared
            .map_or_else(|| "-".to_string(), |d| d.to_string());
        println!("order {}: declared {}, read {}", order.order, declared, order.read);
    }
    println!("vocabulary: {} words", vocabulary.len());
    Ok(())
}
