mod cli;
mod extract_cmd;
mod page_range;
mod scan_cmd;
mod shared;

use clap::Parser;
use cli::Cli;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Extract {
            ref doc,
            ref output,
            ref pages_dir,
            zoom,
            margin,
            discard_page_images,
            ref format,
        } => extract_cmd::run(
            doc,
            &extract_cmd::ExtractArgs {
                output,
                pages_dir: pages_dir.as_deref(),
                zoom,
                margin,
                discard_page_images,
                format,
            },
        ),
        cli::Commands::Scan {
            ref doc,
            ref format,
        } => scan_cmd::run(doc, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
