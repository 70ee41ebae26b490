use super::Target;
use anyhow::Result;
use colored::Colorize;
use gocs_core::ResultCode;

pub fn run(target: &Target) -> Result<ResultCode> {
    let repo = target.open()?;
    let tracked = repo.tracked().count();
    let repo_dir = repo.root().join(gocs_core::paths::REPO_DIR);
    repo.close()?;

    println!(
        "{} {}",
        "Initialized gocs repository in".green().bold(),
        repo_dir.display()
    );
    if tracked > 0 {
        println!("  {}: {}", "Tracked files".bold(), tracked);
    }

    Ok(ResultCode::Ok)
}
