use anyhow::Context;
use clap::Parser;
use layered_coref::{Coref, CorefError, Corpus, MethodRegistry, PipelineConfig, WhitespaceCleaner};
use std::fs;
use std::io;
use std::path::PathBuf;

mod args;
mod prompt;
mod terminal;

use args::Cli;
use prompt::{ask_path, seeded};
use terminal::{MenuChoices, TerminalReview};

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => match e.downcast_ref::<CorefError>() {
            Some(err) if err.is_cancelled() => {
                log::warn!("{}, nothing more was written.", err);
                0
            }
            _ => {
                eprintln!("fatal: {e:?}");
                1
            }
        },
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PipelineConfig::load(&cli.config)?;
    if !cli.methods.is_empty() {
        config.methods = cli.methods;
    }
    if let Some(granularity) = cli.granularity {
        config.granularity = granularity.into();
    }

    let registry = MethodRegistry::with_builtins();
    if cli.list_methods {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut corpus = Corpus::new();
    corpus.set_up(
        &config,
        &mut seeded(cli.input, ask_path),
        &mut seeded(cli.output_dir, ask_path),
    )?;
    corpus.clean(&WhitespaceCleaner::new())?;

    let coref = Coref::run_configured(&corpus, &registry, &config)?;

    for (method, artifact) in coref.outputs() {
        let diff = coref.compare(method)?;
        println!(
            "{}: {} ({} changed, similarity {:.2})",
            method,
            artifact.display(),
            diff.changed_count(),
            diff.similarity()
        );

        if cli.review {
            let mut ui = TerminalReview::new(MenuChoices::default(), io::stdout());
            let reviewed = coref.display(method, &mut ui)?;
            let path = reviewed_path(&corpus, method)?;
            fs::write(&path, reviewed)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("Reviewed text written to {}.", path.display());
        } else {
            println!("{}\n", diff.side_by_side());
        }
    }

    Ok(())
}

/// `{outputDir}/{fileName}_{method}_reviewed.txt`
fn reviewed_path(corpus: &Corpus, method: &str) -> anyhow::Result<PathBuf> {
    let (Some(dir), Some(name)) = (corpus.output_dir(), corpus.file_name()) else {
        anyhow::bail!("{} has no output folder", corpus);
    };
    Ok(dir.join(format!("{}_{}_reviewed.txt", name, method)))
}
