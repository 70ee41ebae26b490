use super::Target;
use anyhow::Result;
use colored::Colorize;
use gocs_core::{Marker, ResultCode};

pub fn run(target: &Target, json: bool) -> Result<ResultCode> {
    let repo = target.open()?;
    let entries = repo.entries();

    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(ResultCode::Ok);
    }

    if entries.is_empty() {
        println!("{}", "Manifest is empty".yellow());
        return Ok(ResultCode::Ok);
    }

    println!("{}", "Manifest".bold().cyan());
    println!();

    let width = entries.len().to_string().len();
    for (index, entry) in entries.iter().enumerate() {
        let marker = match entry.marker {
            Marker::Added => entry.marker.as_str().green(),
            Marker::Updated => entry.marker.as_str().yellow(),
            Marker::Removed => entry.marker.as_str().red(),
        };
        println!(
            "  {:>width$}  {:<5} {}",
            (index + 1).to_string().dimmed(),
            marker,
            entry.path,
            width = width
        );
    }

    println!();
    println!(
        "{} record(s), {} tracked",
        entries.len().to_string().cyan(),
        repo.tracked().count().to_string().cyan()
    );

    Ok(ResultCode::Ok)
}
