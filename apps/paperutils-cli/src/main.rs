//! paperutils
//!
//! Writes a collapsible HTML report of every annotated PDF under a folder.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use arxiv_client::ArxivClient;
use clap::Parser;
use paper_core::{TitleResolver, TreeReporter};
use paper_pdf::{LopdfBackend, PdfTitleGuesser};
use paperutils_cli::config::Config;

#[derive(Parser, Debug)]
#[command(name = "paperutils")]
#[command(version, about = "HTML report of PDF annotations across a folder tree")]
struct Args {
    /// Root folder to scan
    directory: PathBuf,

    /// Resolve titles of arXiv-named files (e.g. 1704.05018.pdf) online
    #[arg(long, alias = "check_arxiv", overrides_with = "no_check_arxiv")]
    check_arxiv: bool,

    /// Guess every title from the PDF itself
    #[arg(long, alias = "no_check_arxiv", overrides_with = "check_arxiv")]
    no_check_arxiv: bool,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file (default: ./paperutils.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn use_arxiv(&self, config: &Config) -> bool {
        if self.check_arxiv {
            true
        } else if self.no_check_arxiv {
            false
        } else {
            config.report.check_arxiv
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    paperutils_cli::init_logging(args.verbose);

    let config = Config::load(args.config.as_deref())?;
    let check_arxiv = args.use_arxiv(&config);
    tracing::debug!("Scanning {} (arXiv lookup: {})", args.directory.display(), check_arxiv);

    let backend = LopdfBackend::new();
    let guesser = PdfTitleGuesser::new();
    let arxiv = ArxivClient::new(config.arxiv.clone()).context("Failed to build arXiv client")?;
    let reporter = TreeReporter::new(&backend, TitleResolver::new(&guesser, &arxiv), check_arxiv);

    let report = reporter
        .report(&args.directory)
        .with_context(|| format!("Failed to build report for {}", args.directory.display()))?;

    match &args.output {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{}", report),
    }

    Ok(())
}
