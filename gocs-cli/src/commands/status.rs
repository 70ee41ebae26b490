use super::Target;
use anyhow::Result;
use colored::Colorize;
use gocs_core::{FileState, ResultCode};

pub fn run(target: &Target, json: bool) -> Result<ResultCode> {
    let repo = target.open()?;
    let entries = repo.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ResultCode::Ok);
    }

    if entries.is_empty() {
        println!("{}", "No tracked files".yellow());
        println!("Run {} to start tracking", "gocs track <path>".cyan());
        return Ok(ResultCode::Ok);
    }

    println!("{}", "Tracked files".bold().cyan());
    println!("  {}: {}", "Root".bold(), repo.root().display());
    println!();

    let mut dirty = 0;
    for entry in &entries {
        let icon = match entry.state {
            FileState::Clean => " ".normal(),
            FileState::Modified => "~".yellow(),
            FileState::Missing => "!".red(),
        };
        let hash = entry
            .snapshot_hash
            .as_deref()
            .map(|h| &h[..8])
            .unwrap_or("--------");

        println!("  {} {} {}", icon, hash.dimmed(), entry.path);
        if entry.state != FileState::Clean {
            dirty += 1;
        }
    }

    println!();
    if dirty == 0 {
        println!("{}", "Working tree matches all snapshots".green());
    } else {
        println!(
            "{} file(s) differ. Run {} to see changes",
            dirty.to_string().yellow(),
            "gocs diff".cyan()
        );
    }

    Ok(ResultCode::Ok)
}
