use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{info, warn};
use path_clean::PathClean;
use podiff::{AlignMode, DiffError, DiffOptions, DiffSession};
use po_catalog::{Catalog, Source};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "podiff")]
#[command(about = "Show the changed translations between two gettext catalogs")]
#[command(version)]
struct Cli {
    #[arg(value_name = "ORIGINAL_FILE", help = "The older catalog, or - for standard input")]
    old: String,

    #[arg(value_name = "UPDATED_FILE", help = "The newer catalog, or - for standard input")]
    new: String,

    #[arg(short = 'l', long, overrides_with = "no_line_numbers", help = "Head each chunk with its line number (default)")]
    line_numbers: bool,

    #[arg(short = 'm', long, overrides_with = "line_numbers", help = "Omit the line-number headings")]
    no_line_numbers: bool,

    #[arg(short, long, value_name = "PATH", help = "Write the report to PATH instead of standard output")]
    output: Option<PathBuf>,

    #[arg(short, long, overrides_with = "strict", help = "Match entries by key instead of by position")]
    relax: bool,

    #[arg(short, long, overrides_with = "relax", help = "Require both catalogs to list the same keys in order (default)")]
    strict: bool,

    #[arg(short, long, help = "Like --relax, and also report entries the updated catalog dropped")]
    full: bool,

    #[arg(short, long, help = "Colorize the report (not implemented)")]
    color: bool,
}

impl Cli {
    fn options(&self) -> DiffOptions {
        let mode = if self.full {
            AlignMode::full()
        } else if self.strict || !self.relax {
            AlignMode::Strict
        } else {
            AlignMode::relaxed()
        };

        DiffOptions::new()
            .line_numbers(self.line_numbers || !self.no_line_numbers)
            .mode(mode)
            .highlight_words(self.color)
    }

    fn sources(&self) -> (Source, Source) {
        (Source::from_arg(&self.old), Source::from_arg(&self.new))
    }
}

/// Failures before the comparison starts
#[derive(Debug, Error)]
enum SetupError {
    #[error("cannot open output file {0}")]
    Output(String),

    #[error("cannot read catalog {0}")]
    Input(String),
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    check_usage(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

/// Reject argument combinations clap cannot express
fn check_usage(cli: &Cli) {
    let (old, new) = cli.sources();

    if old == Source::Stdin && new == Source::Stdin {
        Cli::command()
            .error(ErrorKind::ArgumentConflict, "only one catalog can be read from standard input")
            .exit();
    }

    let Some(output) = &cli.output else {
        return;
    };
    let output = output.clean();

    for source in [&old, &new] {
        if let Source::Path(path) = source {
            if path.clean() == output {
                Cli::command()
                    .error(
                        ErrorKind::ArgumentConflict,
                        format!("output file {} is also an input", path.display()),
                    )
                    .exit();
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli.options();
    if options.highlight_words {
        warn!("--color is not implemented yet; writing plain output");
    }

    // Both catalogs load before the output is touched
    let (old_source, new_source) = cli.sources();
    let old = load(old_source)?;
    let new = load(new_source)?;

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| SetupError::Output(path.display().to_string()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut session = DiffSession::with_options(out, &options);
    let count = session.run(&old, &new, options.mode)?;
    info!("{count} messages differ");

    session.into_inner().flush().context("failed to write the report")?;
    Ok(())
}

fn load(source: Source) -> Result<Catalog> {
    let name = source.to_string();
    let catalog = match source {
        Source::Path(path) => Catalog::load(path),
        Source::Stdin => Catalog::from_reader(io::stdin().lock(), Source::Stdin),
    };

    catalog.with_context(|| SetupError::Input(name))
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if let Some(setup) = err.downcast_ref::<SetupError>() {
        return match setup {
            SetupError::Output(_) => ExitCode::from(4),
            SetupError::Input(_) => ExitCode::from(5),
        };
    }

    let base_mismatch = err
        .chain()
        .any(|cause| matches!(cause.downcast_ref::<DiffError>(), Some(DiffError::BaseMismatch { .. })));
    if base_mismatch {
        eprintln!("hint: the catalogs were not updated from the same template; try --relax or --full");
        return ExitCode::from(2);
    }

    ExitCode::from(3)
}
