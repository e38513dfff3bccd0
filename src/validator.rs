use std::fs::File;
use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::{debug, debug_span};
use xxhash_rust::xxh3::xxh3_128;

use crate::chunk::ChunkReader;
use crate::config::ValidatorConfig;
use crate::error::{ErrorKind, FastqFormatError, ValidationError};
use crate::line::LineScanner;
use crate::record::{Record, RecordAssembler};
use crate::report;
use crate::rules::RecordValidator;

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub records: u64,
    pub lines: u64,
    pub bytes: u64,
}

pub type ValidationResult = Result<ValidationSummary, FastqFormatError>;

/// Fail-fast FASTQ validator.
///
/// Holds the configuration and the lookup tables compiled from it. A
/// validator is immutable, so one instance can check any number of sources,
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidatorConfig,
    rules: RecordValidator,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        let rules = RecordValidator::new(&config);
        Self { config, rules }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Opens and validates a file.
    pub fn validate_path<P: AsRef<Path>>(&self, path: P) -> ValidationResult {
        let path = path.as_ref();
        let _span = debug_span!("validate", path = %path.display()).entered();
        let file = File::open(path)?;
        self.validate_reader(file)
    }

    /// Validates a byte stream from its current position to its end.
    pub fn validate_reader<R: Read>(&self, reader: R) -> ValidationResult {
        self.validate_reader_with_cancel(reader, || false)
    }

    /// Like [`Validator::validate_reader`], polling `should_cancel` before
    /// each record. A `true` ends the run with [`ErrorKind::Cancelled`].
    pub fn validate_reader_with_cancel<R, F>(
        &self,
        reader: R,
        mut should_cancel: F,
    ) -> ValidationResult
    where
        R: Read,
        F: FnMut() -> bool,
    {
        debug!(
            chunk_size = self.config.chunk_size,
            encoding = ?self.config.quality_encoding,
            max_quality = self.config.max_quality_score,
            duplicates = self.config.check_duplicate_names,
            "validating FASTQ stream"
        );

        let mut records = RecordAssembler::new(LineScanner::new(ChunkReader::with_capacity(
            self.config.chunk_size,
            reader,
        )));
        let mut names = self.config.check_duplicate_names.then(NameRegistry::default);
        let mut count = 0;

        let result: Result<(), FastqFormatError> = loop {
            let index = records.record_index();
            if should_cancel() {
                break Err(cancelled(&records, index));
            }

            let record = match records.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break Ok(()),
                Err(halt) => break Err(report::halt(halt, index)),
            };

            if let Err(violation) = self.rules.check(&record) {
                break Err(report::violation(&record, violation).into());
            }
            if let Some(names) = names.as_mut() {
                if let Err(err) = names.insert(&record) {
                    break Err(err.into());
                }
            }
            count = record.index;
        };

        let outcome = result.and_then(|()| {
            if count == 0 && !self.config.allow_empty {
                return Err(ValidationError::new(
                    ErrorKind::EmptyInput,
                    0,
                    records.lines_read(),
                    records.bytes_read(),
                    "no records before end of input".to_string(),
                )
                .into());
            }
            Ok(ValidationSummary {
                records: count,
                lines: records.lines_read(),
                bytes: records.bytes_read(),
            })
        });

        match &outcome {
            Ok(summary) => debug!(
                records = summary.records,
                lines = summary.lines,
                bytes = summary.bytes,
                "FASTQ stream is valid"
            ),
            Err(err) => debug!(kind = err.kind_name(), error = %err, "FASTQ stream is invalid"),
        }
        outcome
    }
}

fn cancelled<R: Read>(records: &RecordAssembler<R>, index: u64) -> FastqFormatError {
    ValidationError::new(
        ErrorKind::Cancelled,
        index,
        records.lines_read(),
        records.bytes_read(),
        format!("cancelled before record {index}"),
    )
    .into()
}

/// Header lines seen so far, as 128-bit fingerprints of the whole line
/// mapped to the record that introduced them.
#[derive(Default)]
struct NameRegistry {
    seen: FxHashMap<u128, u64>,
}

impl NameRegistry {
    fn insert(&mut self, record: &Record<'_>) -> Result<(), ValidationError> {
        let header = record.header.bytes;
        let Some(first_record) = self.seen.insert(xxh3_128(header), record.index) else {
            return Ok(());
        };
        Err(ValidationError::new(
            ErrorKind::DuplicateReadName { first_record },
            record.index,
            record.header.number,
            record.header.offset,
            format!(
                "header \"{}\" already used by record {first_record}",
                report::excerpt(header)
            ),
        ))
    }
}
