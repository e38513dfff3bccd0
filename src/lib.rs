mod chunk;
mod config;
mod error;
mod line;
mod record;
mod report;
mod rules;
mod validator;

use std::io::Read;
use std::path::Path;

pub use config::{
    Alphabet, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_QUALITY_SCORE, QualityEncoding, ValidatorConfig,
};
pub use error::{AlphabetError, ErrorKind, FastqFormatError, ValidationError};
pub use validator::{ValidationResult, ValidationSummary, Validator};

/// Validates a FASTQ file with the default configuration.
pub fn validate<P: AsRef<Path>>(path: P) -> ValidationResult {
    Validator::default().validate_path(path)
}

/// Validates a FASTQ byte stream with the default configuration.
pub fn validate_reader<R: Read>(reader: R) -> ValidationResult {
    Validator::default().validate_reader(reader)
}
