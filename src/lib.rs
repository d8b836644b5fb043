// src/lib.rs

pub mod alert;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod pipeline;
pub mod retry;
pub mod store;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::alert::LogAlerter;
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::PipelineFile;
use crate::pipeline::Pipeline;
use crate::store::{MemoryStore, TaskStatus};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - topology loading
/// - an in-memory task store and the default alerter
/// - the pipeline loop around the orchestration engine
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let store = MemoryStore::new();
    let alerter = Arc::new(LogAlerter);
    let pipeline = Pipeline::new(&cfg, Arc::new(store), alerter);

    let report = pipeline.run().await?;

    println!("taskrelay run finished");
    println!("  executed: {:?}", report.executed);
    for (id, record) in report.records.iter() {
        match record {
            Some(record) => {
                print!("  - {id}: {:?}", record.status);
                if record.status == TaskStatus::Fulfilled {
                    if let Some(ref output) = record.output {
                        print!(" ({output})");
                    }
                } else if let Some(ref error) = record.error {
                    print!(" ({error})");
                }
                println!();
            }
            None => println!("  - {id}: never written"),
        }
    }

    Ok(())
}

/// Simple dry-run output: print tasks, parents and children.
fn print_dry_run(cfg: &PipelineFile) {
    println!("taskrelay dry-run");
    println!("tasks ({}):", cfg.tasks().len());
    for (id, entry) in cfg.tasks().iter() {
        println!("  - {id}");
        if !entry.after.is_empty() {
            println!("      after: {:?}", entry.after);
        }
        if !entry.next.is_empty() {
            println!("      next: {:?}", entry.next);
        }
    }
    println!("roots: {:?}", cfg.roots());

    debug!("dry-run complete (no execution)");
}
