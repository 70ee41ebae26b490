pub mod diff;
pub mod init;
pub mod log;
pub mod status;
pub mod track;
pub mod untrack;

use anyhow::{Context, Result};
use colored::Colorize;
use gocs_core::{Error, Repository, RepositoryOptions, ResultCode};
use std::path::PathBuf;

/// Repository root and options resolved from the command line.
pub struct Target {
    pub root: PathBuf,
    pub options: RepositoryOptions,
}

impl Target {
    pub fn new(root: Option<PathBuf>, context: usize) -> Result<Self> {
        let root = match root {
            Some(root) => root,
            None => std::env::current_dir().context("Could not determine current directory")?,
        };

        Ok(Self {
            root,
            options: RepositoryOptions {
                diff_context: context,
            },
        })
    }

    pub fn open(&self) -> Result<Repository> {
        Repository::open_with(&self.root, self.options)
            .with_context(|| format!("Could not open repository at {}", self.root.display()))
    }
}

/// Keeps the most severe of two outcomes.
pub fn worst(a: ResultCode, b: ResultCode) -> ResultCode {
    fn rank(code: ResultCode) -> u8 {
        match code {
            ResultCode::Ok => 0,
            ResultCode::NotTracked => 1,
            ResultCode::AccessError => 2,
            ResultCode::FatalError => 3,
        }
    }
    if rank(b) > rank(a) {
        b
    } else {
        a
    }
}

/// Prints a per-path failure and returns its result code.
pub fn report(op: &str, path: &std::path::Path, err: &Error) -> ResultCode {
    eprintln!(
        "{} {} {}: {}",
        "error:".red().bold(),
        op,
        path.display(),
        err
    );
    ResultCode::from(err)
}

pub fn print_unified(text: &str) {
    for line in text.lines() {
        let colored = if line.starts_with("+++") || line.starts_with("---") {
            line.bold()
        } else if line.starts_with("@@") {
            line.cyan()
        } else if line.starts_with('+') {
            line.green()
        } else if line.starts_with('-') {
            line.red()
        } else {
            line.normal()
        };
        println!("{}", colored);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_prefers_fatal() {
        assert_eq!(worst(ResultCode::Ok, ResultCode::NotTracked), ResultCode::NotTracked);
        assert_eq!(
            worst(ResultCode::FatalError, ResultCode::AccessError),
            ResultCode::FatalError
        );
        assert_eq!(worst(ResultCode::AccessError, ResultCode::Ok), ResultCode::AccessError);
    }
}
