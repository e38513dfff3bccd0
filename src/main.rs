//! fqvalidate: streaming FASTQ format validator
//!
//! Usage: fqvalidate [OPTIONS] <INPUT>...

use clap::{Parser, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use fastq_validate::{
    Alphabet, AlphabetError, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_QUALITY_SCORE, FastqFormatError,
    QualityEncoding, ValidationResult, Validator, ValidatorConfig,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fqvalidate")]
#[command(version)]
#[command(about = "Streaming, fail-fast FASTQ format validator", long_about = None)]
struct Cli {
    /// FASTQ files to validate (use - for stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Bytes read from the input at a time
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters accepted on sequence lines
    #[arg(long, value_enum, default_value_t = AlphabetArg::Nucleotide)]
    alphabet: AlphabetArg,

    /// Additional ASCII characters accepted on sequence lines, e.g. "-."
    #[arg(long)]
    extra_bases: Option<String>,

    /// ASCII offset of quality characters
    #[arg(long, value_enum, default_value_t = EncodingArg::Phred33)]
    encoding: EncodingArg,

    /// Highest accepted Phred score
    #[arg(long, default_value_t = DEFAULT_MAX_QUALITY_SCORE)]
    max_quality: u8,

    /// Reject read names that appear more than once
    #[arg(long)]
    check_duplicates: bool,

    /// Treat an input without records as invalid
    #[arg(long)]
    reject_empty: bool,

    /// Only report invalid inputs
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlphabetArg {
    /// ACGTN, either case
    Nucleotide,
    /// IUPAC nucleotide and ambiguity codes, either case
    Iupac,
}

#[derive(Clone, Copy, ValueEnum)]
enum EncodingArg {
    Phred33,
    Phred64,
}

impl Cli {
    fn config(&self) -> Result<ValidatorConfig, AlphabetError> {
        let alphabet = match self.alphabet {
            AlphabetArg::Nucleotide => Alphabet::nucleotide(),
            AlphabetArg::Iupac => Alphabet::iupac(),
        };
        let alphabet = match &self.extra_bases {
            Some(extra) => alphabet.with_extra(extra)?,
            None => alphabet,
        };
        let encoding = match self.encoding {
            EncodingArg::Phred33 => QualityEncoding::Phred33,
            EncodingArg::Phred64 => QualityEncoding::Phred64,
        };

        Ok(ValidatorConfig::default()
            .with_chunk_size(self.chunk_size)
            .with_alphabet(alphabet)
            .with_quality_encoding(encoding)
            .with_max_quality_score(self.max_quality)
            .with_duplicate_check(self.check_duplicates)
            .with_allow_empty(!self.reject_empty))
    }
}

fn run(validator: &Validator, input: &Path) -> ValidationResult {
    if input == Path::new("-") {
        validator.validate_reader(io::stdin().lock())
    } else {
        validator.validate_path(input)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let validator = match cli.config() {
        Ok(config) => Validator::new(config),
        Err(e) => {
            eprintln!("error: --extra-bases: {e}");
            return ExitCode::from(2);
        }
    };

    let mut format_failure = false;
    let mut io_failure = false;

    for input in &cli.inputs {
        let start = Instant::now();
        let result = run(&validator, input);
        tracing::info!(
            input = %input.display(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "validation finished"
        );

        match result {
            Ok(summary) => {
                if !cli.quiet {
                    println!("{}: valid ({} records)", input.display(), summary.records);
                }
            }
            Err(e) => {
                eprintln!("{}: {}: {}", input.display(), e.kind_name(), e);
                match e {
                    FastqFormatError::Io(_) => io_failure = true,
                    FastqFormatError::Invalid(_) => format_failure = true,
                }
            }
        }
    }

    if io_failure {
        ExitCode::from(2)
    } else if format_failure {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
