//! # orfscan
//!
//! Six-frame ORF scanner for nucleotide FASTA.
//!
//! ```bash
//! # All ORFs of at least 20 aa, both strands
//! orfscan genome.fa > orfs.fa
//!
//! # Bacterial code, ORFs must start at an initiator
//! orfscan -c 11 -M -l 50 genome.fa -o orfs.fa
//!
//! # Streamed input can only be scanned on the top strand
//! zcat genome.fa.gz | orfscan --watson -
//! ```
//!
//! Files on disk are indexed first so the bottom strand can be read window by
//! window without loading whole chromosomes.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use env_logger::Env;
use log::*;
use orfscan_core::emit::OrfEmitter;
use orfscan_core::io::{FastaOrfWriter, FastaReader, IndexedFasta, OrfSink, TableOrfWriter};
use orfscan_core::{
    BioError, GeneticCode, OrfScanner, ScanConfig, SequenceSource, StartPolicy, StrandSelection,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn cli() -> Command {
    Command::new("orfscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate nucleotide sequences in six frames and report open reading frames")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .help("Input FASTA file; '-' or omitted reads standard input"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)"),
        )
        .arg(
            Arg::new("code")
                .short('c')
                .long("code")
                .value_name("ID")
                .value_parser(value_parser!(u8))
                .default_value("1")
                .help("NCBI translation table id (see --list-codes)"),
        )
        .arg(
            Arg::new("min-len")
                .short('l')
                .long("min-len")
                .value_name("AA")
                .value_parser(value_parser!(usize))
                .default_value("20")
                .help("Minimum ORF length in amino acids"),
        )
        .arg(
            Arg::new("aug")
                .short('m')
                .action(ArgAction::SetTrue)
                .conflicts_with("initiator")
                .help("ORFs must start with AUG"),
        )
        .arg(
            Arg::new("initiator")
                .short('M')
                .action(ArgAction::SetTrue)
                .help("ORFs must start with an initiator of the selected code"),
        )
        .arg(
            Arg::new("watson")
                .long("watson")
                .action(ArgAction::SetTrue)
                .conflicts_with("crick")
                .help("Only scan the top strand (frames 1-3)"),
        )
        .arg(
            Arg::new("crick")
                .long("crick")
                .action(ArgAction::SetTrue)
                .help("Only scan the bottom strand (frames 4-6)"),
        )
        .arg(
            Arg::new("window")
                .long("window")
                .value_name("NT")
                .value_parser(value_parser!(usize))
                .default_value("1048576")
                .help("Nucleotides held in memory per window"),
        )
        .arg(
            Arg::new("overlap")
                .long("overlap")
                .value_name("NT")
                .value_parser(value_parser!(usize))
                .default_value("3")
                .help("Nucleotides shared by consecutive windows (at least 2)"),
        )
        .arg(
            Arg::new("tbl")
                .long("tbl")
                .action(ArgAction::SetTrue)
                .help("Write a tab-separated table instead of FASTA"),
        )
        .arg(
            Arg::new("list-codes")
                .long("list-codes")
                .action(ArgAction::SetTrue)
                .help("List available translation tables and exit"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Only log warnings and errors"),
        )
}

fn config_from(matches: &ArgMatches) -> ScanConfig {
    let start_policy = if matches.get_flag("aug") {
        StartPolicy::RequireAug
    } else if matches.get_flag("initiator") {
        StartPolicy::RequireAnyInitiator
    } else {
        StartPolicy::None
    };
    let strands = if matches.get_flag("watson") {
        StrandSelection::WatsonOnly
    } else if matches.get_flag("crick") {
        StrandSelection::CrickOnly
    } else {
        StrandSelection::Both
    };
    let defaults = ScanConfig::default();
    ScanConfig {
        genetic_code: matches
            .get_one::<u8>("code")
            .copied()
            .unwrap_or(defaults.genetic_code),
        min_len: matches
            .get_one::<usize>("min-len")
            .copied()
            .unwrap_or(defaults.min_len),
        start_policy,
        strands,
        window_size: matches
            .get_one::<usize>("window")
            .copied()
            .unwrap_or(defaults.window_size),
        overlap: matches
            .get_one::<usize>("overlap")
            .copied()
            .unwrap_or(defaults.overlap),
    }
}

/// Errors that end the run instead of skipping one record.
fn is_fatal(err: &BioError, streaming: bool) -> bool {
    match err {
        BioError::NonRewindableSource { .. } => true,
        BioError::Io(io_err) => streaming || io_err.kind() == io::ErrorKind::BrokenPipe,
        _ => false,
    }
}

/// Tally of one run.
#[derive(Default)]
struct RunSummary {
    sequences: usize,
    orfs: usize,
    failed: usize,
}

impl RunSummary {
    fn record<S>(&mut self, source: &S, result: Result<usize, BioError>, streaming: bool) -> Result<()>
    where
        S: SequenceSource + ?Sized,
    {
        match result {
            Ok(n) => {
                self.sequences += 1;
                self.orfs += n;
                Ok(())
            }
            Err(err) if is_fatal(&err, streaming) => {
                Err(err).with_context(|| format!("failed to scan '{}'", source.name()))
            }
            Err(err) => {
                warn!("skipping '{}': {}", source.name(), err);
                self.failed += 1;
                Ok(())
            }
        }
    }
}

fn scan_stream(
    scanner: &OrfScanner,
    sink: &mut dyn OrfSink,
    summary: &mut RunSummary,
) -> Result<()> {
    let stdin = io::stdin();
    let mut reader = FastaReader::new(stdin.lock());
    let mut emitter = OrfEmitter::new();
    while let Some(next) = reader.next_source() {
        let mut source = match next {
            Ok(source) => source,
            Err(err) if is_fatal(&err, true) => return Err(err).context("failed to read input"),
            Err(err) => {
                warn!("skipping record: {}", err);
                summary.failed += 1;
                continue;
            }
        };
        let result = scanner.scan_to(&mut source, &mut emitter, &mut *sink);
        summary.record(&source, result, true)?;
    }
    Ok(())
}

fn scan_file(
    path: &str,
    scanner: &OrfScanner,
    sink: &mut dyn OrfSink,
    summary: &mut RunSummary,
) -> Result<()> {
    let mut fasta =
        IndexedFasta::open(path).with_context(|| format!("failed to index '{path}'"))?;
    info!("{}: {} sequences", path, fasta.len());
    let mut emitter = OrfEmitter::new();
    for i in 0..fasta.len() {
        let mut source = match fasta.source(i) {
            Some(Ok(source)) => source,
            Some(Err(err)) => {
                warn!("skipping record {} of '{}': {}", i + 1, path, err);
                summary.failed += 1;
                continue;
            }
            None => break,
        };
        let result = scanner.scan_to(&mut source, &mut emitter, &mut *sink);
        summary.record(&source, result, false)?;
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<RunSummary> {
    let config = config_from(matches);
    let scanner = OrfScanner::new(config).context("invalid configuration")?;

    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .filter(|path| *path != "-");
    if input.is_none() && scanner.config().strands.includes_reverse() {
        return Err(BioError::NonRewindableSource {
            name: "<stdin>".to_string(),
        }
        .into());
    }

    let out: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create '{path}'"))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let mut sink: Box<dyn OrfSink> = if matches.get_flag("tbl") {
        Box::new(TableOrfWriter::new(out)?)
    } else {
        Box::new(FastaOrfWriter::new(out))
    };

    let mut summary = RunSummary::default();
    match input {
        Some(path) => scan_file(path, &scanner, sink.as_mut(), &mut summary)?,
        None => scan_stream(&scanner, sink.as_mut(), &mut summary)?,
    }
    sink.finish()?;
    Ok(summary)
}

fn list_codes() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (id, name) in GeneticCode::available() {
        writeln!(out, "{id}\t{name}")?;
    }
    Ok(())
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
    })
}

fn main() {
    let matches = cli().get_matches();
    let filter = if matches.get_flag("quiet") { "warn" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    let result = if matches.get_flag("list-codes") {
        list_codes().map(|_| None)
    } else {
        run(&matches).map(Some)
    };

    match result {
        Ok(None) => {}
        Ok(Some(summary)) => {
            info!(
                "{} ORFs from {} sequences",
                summary.orfs, summary.sequences
            );
            if summary.failed > 0 {
                error!("{} records could not be scanned", summary.failed);
                std::process::exit(1);
            }
        }
        Err(err) => {
            if is_broken_pipe(&err) {
                std::process::exit(0);
            }
            error!("{:#}", err);
            std::process::exit(1);
        }
    }
}
