use std::{
    fs::File,
    io::{BufWriter, stdout},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use lib_nevscore::substitution_matrix::NEV_BLOSUM62;

#[derive(Parser)]
pub struct Cli {
    /// Write the matrix to this file instead of stdout.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,
}

pub fn cli(cli: Cli) -> Result<()> {
    if let Some(output) = &cli.output {
        let file = File::create(output)
            .with_context(|| format!("Cannot create matrix output file {output:?}"))?;
        NEV_BLOSUM62.write_plain(BufWriter::new(file))?;
    } else {
        NEV_BLOSUM62.write_plain(stdout().lock())?;
    }

    Ok(())
}
