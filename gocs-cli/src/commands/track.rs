use super::{print_unified, report, worst, Target};
use anyhow::Result;
use colored::Colorize;
use gocs_core::{ResultCode, TrackKind};
use std::path::PathBuf;

pub fn run(target: &Target, paths: Vec<PathBuf>, show_diff: bool) -> Result<ResultCode> {
    let mut repo = target.open()?;
    let mut code = ResultCode::Ok;

    for path in &paths {
        match repo.track(path) {
            Ok(outcome) => {
                let marker = outcome.kind.marker().as_str();
                let marker = match outcome.kind {
                    TrackKind::Added => marker.green(),
                    TrackKind::Updated => marker.yellow(),
                };
                println!(
                    "{} {} {}",
                    marker,
                    outcome.path,
                    outcome.content_hash[..8].dimmed()
                );

                if show_diff {
                    if let Some(diff) = outcome.diff.as_deref().filter(|d| !d.is_empty()) {
                        print_unified(diff);
                    }
                }
            }
            Err(e) => code = worst(code, report("track", path, &e)),
        }
    }

    repo.close()?;
    Ok(code)
}
