use std::{
    env,
    fs::{create_dir_all, read_to_string},
    path::PathBuf,
};

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use nevscore::{matrix, score};

const OUTPUT_DIRECTORY: &str = "target/nevscore-tests";

fn repo_root() -> Result<PathBuf> {
    // this crate lives in "[...]/nevscore/nevscore-tests"
    Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .ok_or(anyhow!("No parent directory"))?
        .to_path_buf())
}

pub fn run_in_repo_root(args: &str) -> Result<()> {
    // simulate a call from the repo root
    env::set_current_dir(repo_root()?)?;

    if args.starts_with("score ") {
        let args = score::Cli::parse_from(args.split_whitespace());
        score::cli(args)?;
    } else if args.starts_with("matrix ") {
        let args = matrix::Cli::parse_from(args.split_whitespace());
        matrix::cli(args)?;
    } else {
        bail!("Unknown command: {args}");
    }

    Ok(())
}

/// Returns a path for an output file, relative to the repo root.
pub fn output_path(name: &str) -> Result<String> {
    create_dir_all(repo_root()?.join(OUTPUT_DIRECTORY))?;
    Ok(format!("{OUTPUT_DIRECTORY}/{name}"))
}

pub fn read_output(path: &str) -> Result<String> {
    Ok(read_to_string(repo_root()?.join(path))?)
}
