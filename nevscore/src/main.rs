use clap::{Parser, Subcommand};
use nevscore::{matrix, score};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score the conservation of signature residues in alignment hits.
    Score(score::Cli),
    /// Print the substitution matrix used for scoring.
    Matrix(matrix::Cli),
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Score(cli) => score::cli(cli),
        Command::Matrix(cli) => matrix::cli(cli),
    }
}
