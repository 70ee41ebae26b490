use super::{print_unified, report, worst, Target};
use anyhow::Result;
use colored::Colorize;
use gocs_core::ResultCode;
use std::path::PathBuf;

pub fn run(target: &Target, paths: Vec<PathBuf>) -> Result<ResultCode> {
    let repo = target.open()?;
    let paths = if paths.is_empty() {
        repo.tracked().map(PathBuf::from).collect()
    } else {
        paths
    };

    let mut code = ResultCode::Ok;
    let mut shown = 0;

    for path in &paths {
        let diff = match repo.diff(path) {
            Ok(Some(diff)) => diff,
            Ok(None) => {
                println!("{} {}", path.display(), "is not tracked".yellow());
                code = worst(code, ResultCode::NotTracked);
                continue;
            }
            Err(e) => {
                code = worst(code, report("diff", path, &e));
                continue;
            }
        };

        if !diff.has_changes() {
            continue;
        }

        println!("{}", "━".repeat(80).bright_black());
        if diff.is_binary() {
            println!("{} {}", diff.path.white().bold(), "[binary]".dimmed());
        } else {
            println!(
                "{} {} {}",
                diff.path.white().bold(),
                format!("+{}", diff.additions()).green(),
                format!("-{}", diff.deletions()).red()
            );
        }
        print_unified(&diff.format_unified(repo.options().diff_context));
        shown += 1;
    }

    if shown == 0 && code == ResultCode::Ok {
        println!("{}", "No changes against snapshots".green());
    }

    Ok(code)
}
