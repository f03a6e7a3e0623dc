// FILE: src/cli/handlers.rs
use crate::{
    error::{Result, RouteError},
    pipeline::{GenerationOutcome, GenerationStats, RouteGenerator},
    watch,
};

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Effective settings once flags and the config file are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub watch: bool,
    pub debounce: Duration,
    pub exec: Option<String>,
    pub stats: bool,
}

/// Checks every target and returns their canonical paths.
pub fn resolve_targets(paths: &[String]) -> Result<Vec<PathBuf>> {
    paths
        .iter()
        .map(|path| -> Result<PathBuf> {
            let target = Path::new(path);
            if !target.exists() {
                return Err(RouteError::PathNotFound { path: path.clone() });
            }
            if !target.is_dir() {
                return Err(RouteError::NotADirectory { path: path.clone() });
            }
            Ok(fs::canonicalize(target)?)
        })
        .collect()
}

// --- GENERATE ---
pub fn handle_generate(targets: &[PathBuf], options: &RunOptions) -> Result<()> {
    let mut generators: Vec<RouteGenerator> = targets
        .iter()
        .map(|target| RouteGenerator::new(target.clone()).with_exec(options.exec.clone()))
        .collect();

    let mut first_error = None;
    for generator in &mut generators {
        log::info!("Generating routes for {}", generator.root().display());
        match generator.regenerate() {
            Ok(outcome) => report(generator.root(), &outcome, options.stats)?,
            Err(e) => {
                log::error!("Generation failed for {}: {}", generator.root().display(), e);
                first_error.get_or_insert(e);
            }
        }
    }

    if options.watch {
        let stats = options.stats;
        return watch::watch(generators.as_mut_slice(), options.debounce, |root, outcome| {
            if let Err(e) = report(root, outcome, stats) {
                log::error!("{}", e);
            }
        });
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[derive(Serialize)]
struct PassReport<'a> {
    root: String,
    #[serde(flatten)]
    stats: &'a GenerationStats,
}

fn report(root: &Path, outcome: &GenerationOutcome, print_stats: bool) -> Result<()> {
    let GenerationOutcome::Generated(stats) = outcome else {
        return Ok(());
    };
    if print_stats {
        let report = PassReport {
            root: root.display().to_string(),
            stats,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| RouteError::invalid_format(format!("Cannot serialize stats: {}", e)))?;
        println!("{}", json);
    }
    Ok(())
}
