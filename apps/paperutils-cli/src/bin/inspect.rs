//! paper-inspect
//!
//! Dumps the annotation objects of one PDF page by page.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use paper_core::describe_annotations;
use paper_pdf::LopdfBackend;

#[derive(Parser, Debug)]
#[command(name = "paper-inspect")]
#[command(version, about = "List the annotations of a PDF page by page")]
struct Args {
    /// PDF file to inspect
    path: PathBuf,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    paperutils_cli::init_logging(args.verbose);

    let dump = describe_annotations(&LopdfBackend::new(), &args.path)
        .with_context(|| format!("Failed to inspect {}", args.path.display()))?;
    print!("{}", dump);
    Ok(())
}
