use super::{report, worst, Target};
use anyhow::Result;
use colored::Colorize;
use gocs_core::{ResultCode, UntrackOutcome};
use std::path::PathBuf;

pub fn run(target: &Target, paths: Vec<PathBuf>) -> Result<ResultCode> {
    let mut repo = target.open()?;
    let mut code = ResultCode::Ok;

    for path in &paths {
        match repo.untrack(path) {
            Ok(UntrackOutcome::Removed) => {
                println!("{} {}", "--".red(), path.display());
            }
            Ok(UntrackOutcome::NotTracked) => {
                println!("{} {}", path.display(), "is not tracked".yellow());
                code = worst(code, ResultCode::NotTracked);
            }
            Err(e) => code = worst(code, report("untrack", path, &e)),
        }
    }

    repo.close()?;
    Ok(code)
}
