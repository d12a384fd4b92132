use std::{
    fs::{File, read_to_string},
    io::{BufReader, BufWriter, stdout},
    path::{Path, PathBuf},
    sync::atomic::AtomicBool,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lib_nevscore::{
    alignment::io::{AlignmentFormat, read_alignment_hits},
    config::ScoringConfig,
    result_table::ScoringRun,
    signature::SignatureGroups,
};
use log::{LevelFilter, debug, info};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

#[derive(Parser)]
pub struct Cli {
    #[clap(long, short = 'l', default_value = "info")]
    log_level: LevelFilter,

    /// The file containing the alignment hits.
    #[clap(long, short = 'i')]
    input: PathBuf,

    #[clap(long, short = 'f', default_value = "blast-xml")]
    input_format: InputFormat,

    /// The signature groups as nested list, e.g. `[[['10','C'],['25','G']],[['40','W']]]`.
    ///
    /// Residue-position lists like `[C10, G25], [W40]` are accepted as well.
    #[clap(
        long,
        short = 's',
        required_unless_present = "signature_file",
        conflicts_with = "signature_file"
    )]
    signatures: Option<String>,

    /// A file containing the signature groups in the same notation as `--signatures`.
    #[clap(long)]
    signature_file: Option<PathBuf>,

    /// The CSV file to write the result table to.
    ///
    /// If not given, the table is written to stdout.
    #[clap(long, short = 'o')]
    output: Option<PathBuf>,

    /// Additionally write the residue pairs as `~`-separated lines to this file.
    #[clap(long)]
    raw_output: Option<PathBuf>,

    /// A toml file with scoring settings.
    ///
    /// Command line arguments take precedence over the settings in this file.
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// The number of worker threads.
    #[clap(long, short = 't')]
    threads: Option<usize>,

    /// Write a header row naming the columns.
    #[clap(long)]
    header: bool,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum InputFormat {
    BlastXml,
    Tsv,
}

impl From<InputFormat> for AlignmentFormat {
    fn from(value: InputFormat) -> Self {
        match value {
            InputFormat::BlastXml => Self::BlastXml,
            InputFormat::Tsv => Self::Tsv,
        }
    }
}

pub fn cli(cli: Cli) -> Result<()> {
    if let Err(error) = TermLogger::init(
        cli.log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        // An earlier command in the same process already installed a logger.
        debug!("Keeping existing logger: {error}");
    }

    let mut config = if let Some(config) = &cli.config {
        info!("Loading scoring config {config:?}");
        read_config(config)?
    } else {
        ScoringConfig::default()
    };
    config.threads = cli.threads.or(config.threads);
    config.write_header |= cli.header;
    debug!("Using {config:?}");

    let literal = if let Some(signature_file) = &cli.signature_file {
        info!("Loading signature file {signature_file:?}");
        read_to_string(signature_file)
            .with_context(|| format!("Cannot read signature file {signature_file:?}"))?
    } else {
        cli.signatures.clone().unwrap_or_default()
    };
    let groups = SignatureGroups::parse_literal(&literal)?;
    info!("Parsed {} signature groups", groups.len());

    info!("Loading alignment hits {:?}", cli.input);
    let input = File::open(&cli.input)
        .with_context(|| format!("Cannot open alignment file {:?}", cli.input))?;
    let hits = read_alignment_hits(cli.input_format.into(), BufReader::new(input))
        .with_context(|| format!("Cannot read alignment file {:?}", cli.input))?;

    let table = ScoringRun::new(&groups, config.scorer())
        .with_threads(config.threads)
        .score(hits, &AtomicBool::new(false))?;

    if let Some(output) = &cli.output {
        info!("Writing result table to {output:?}");
        let file = File::create(output)
            .with_context(|| format!("Cannot create output file {output:?}"))?;
        table.write_csv(BufWriter::new(file), config.write_header)?;
    } else {
        table.write_csv(stdout().lock(), config.write_header)?;
    }

    if let Some(raw_output) = &cli.raw_output {
        info!("Writing raw residue pairs to {raw_output:?}");
        let file = File::create(raw_output)
            .with_context(|| format!("Cannot create raw output file {raw_output:?}"))?;
        table.write_raw(BufWriter::new(file))?;
    }

    Ok(())
}

fn read_config(path: &Path) -> Result<ScoringConfig> {
    let config =
        read_to_string(path).with_context(|| format!("Cannot read scoring config {path:?}"))?;
    toml::from_str(&config).with_context(|| format!("Cannot parse scoring config {path:?}"))
}
