use std::fs::File;
use std::io::{Cursor, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use fastq_validate::{
    Alphabet, ErrorKind, FastqFormatError, QualityEncoding, ValidationError, ValidationSummary,
    Validator, ValidatorConfig, validate, validate_reader,
};
use tempfile::NamedTempFile;

fn sample_fastq(records: usize, line_ending: &str) -> String {
    let bases = ["ACGT", "TTGACN", "acgtnACGTN", "G", ""];
    let mut out = String::new();
    for i in 0..records {
        let seq = bases[i % bases.len()].repeat(i % 7 + 1);
        let qual: String = (0..seq.len())
            .map(|j| char::from(b'!' + ((i + j) % 42) as u8))
            .collect();
        let name = format!("read{i} lane:{}", i % 4);
        let sep = if i % 3 == 0 { name.as_str() } else { "" };
        out.push_str(&format!(
            "@{name}{le}{seq}{le}+{sep}{le}{qual}{le}",
            le = line_ending
        ));
    }
    out
}

fn write_temp(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

fn invalid(data: &[u8]) -> ValidationError {
    match validate_reader(Cursor::new(data)) {
        Err(FastqFormatError::Invalid(err)) => err,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn test_single_record_is_valid() {
    let summary = validate_reader(Cursor::new(b"@r1\nACGT\n+\n!!!!\n")).unwrap();
    assert_eq!(
        summary,
        ValidationSummary {
            records: 1,
            lines: 4,
            bytes: 16
        }
    );
}

#[test]
fn test_two_records_are_valid() {
    let summary = validate_reader(Cursor::new(b"@r1\nACGT\n+\n!!!!\n@r2\nAC\n+\n!!\n")).unwrap();
    assert_eq!(summary.records, 2);
}

#[test]
fn test_length_mismatch() {
    let err = invalid(b"@r1\nACGT\n+\n!!!\n");
    assert_eq!(
        err.kind(),
        &ErrorKind::LengthMismatch {
            sequence: 4,
            quality: 3
        }
    );
    assert_eq!(err.record_index(), 1);
    assert_eq!(err.line_number(), 4);
    assert_eq!(err.byte_offset(), 11);
}

#[test]
fn test_invalid_sequence_character() {
    let err = invalid(b"@r1\nACXT\n+\n!!!!\n");
    assert_eq!(
        err.kind(),
        &ErrorKind::InvalidSequenceCharacter {
            character: 'X',
            column: 3
        }
    );
    assert_eq!(err.record_index(), 1);
    assert_eq!(err.line_number(), 2);
    assert_eq!(err.byte_offset(), 6);
}

#[test]
fn test_truncated_final_record() {
    let err = invalid(b"@r1\nACGT\n+\n!!!!\n@r2\nAC\n+\n");
    assert_eq!(err.kind(), &ErrorKind::TruncatedRecord { lines: 3 });
    assert_eq!(err.record_index(), 2);
    assert_eq!(err.line_number(), 5);
}

#[test]
fn test_fail_fast_reports_first_fault() {
    let data = b"@r1\nACGT\n+\n!!!!\nr2\nACGT\n+\n!!!!\n@r3\nACGT\n+\n!!\n@r4\n";
    let err = invalid(data);
    assert_eq!(err.kind(), &ErrorKind::HeaderFormat);
    assert_eq!(err.record_index(), 2);
    assert_eq!(err.line_number(), 5);
}

#[test]
fn test_separator_faults() {
    assert_eq!(invalid(b"@r1\nACGT\n-\n!!!!\n").kind(), &ErrorKind::SeparatorFormat);

    let err = invalid(b"@r1\nACGT\n+r2\n!!!!\n");
    assert_eq!(err.kind(), &ErrorKind::SeparatorMismatch);
    assert_eq!(err.line_number(), 3);

    assert!(validate_reader(Cursor::new(b"@r1\nACGT\n+r1\n!!!!\n")).is_ok());
}

#[test]
fn test_quality_score_range() {
    let validator = Validator::new(ValidatorConfig::default().with_max_quality_score(40));
    let err = validator
        .validate_reader(Cursor::new(b"@r1\nACGT\n+\nII5J\n"))
        .unwrap_err();
    let err = err.validation_error().unwrap();
    assert_eq!(
        err.kind(),
        &ErrorKind::QualityScoreRange {
            character: 'J',
            column: 4,
            score: 41,
            max: 40
        }
    );
    assert_eq!(err.byte_offset(), 14);
}

#[test]
fn test_phred64_input() {
    let data = b"@r1\nACGT\n+\n@Th;\n";
    let phred64 = Validator::new(
        ValidatorConfig::default().with_quality_encoding(QualityEncoding::Phred64),
    );
    let err = phred64.validate_reader(Cursor::new(&data[..])).unwrap_err();
    assert!(matches!(
        err.validation_error().unwrap().kind(),
        ErrorKind::QualityScoreRange {
            character: ';',
            column: 4,
            score: -5,
            ..
        }
    ));
    assert!(validate_reader(Cursor::new(&data[..])).is_ok());
}

#[test]
fn test_iupac_alphabet() {
    let data = b"@r1\nACRYN\n+\nIIIII\n";
    assert!(matches!(
        invalid(data).kind(),
        ErrorKind::InvalidSequenceCharacter {
            character: 'R',
            column: 3
        }
    ));
    let iupac = Validator::new(ValidatorConfig::default().with_alphabet(Alphabet::iupac()));
    assert_eq!(iupac.validate_reader(Cursor::new(&data[..])).unwrap().records, 1);
}

#[test]
fn test_encoding_error() {
    let err = invalid(b"@r1\nACGT\n+\n!!\x07!\n");
    assert_eq!(err.kind(), &ErrorKind::Encoding { byte: 0x07 });
    assert_eq!(err.record_index(), 1);
    assert_eq!(err.line_number(), 4);
    assert_eq!(err.byte_offset(), 13);
}

#[test]
fn test_missing_final_newline_and_trailing_blank_lines() {
    assert_eq!(validate_reader(Cursor::new(b"@r1\nACGT\n+\n!!!!")).unwrap().records, 1);
    assert_eq!(validate_reader(Cursor::new(b"@r1\nACGT\n+\n!!!!\n\n\n")).unwrap().records, 1);
    assert_eq!(validate_reader(Cursor::new(b"")).unwrap().records, 0);
}

#[test]
fn test_io_error() {
    struct Broken;

    impl std::io::Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("read failed"))
        }
    }

    let err = validate_reader(Broken).unwrap_err();
    assert!(matches!(err, FastqFormatError::Io(_)));
    assert_eq!(err.kind_name(), "IoError");
}

#[test]
fn test_fastq_file_lf() {
    let file = write_temp(sample_fastq(500, "\n").as_bytes());
    let summary = validate(file.path()).unwrap();
    assert_eq!(summary.records, 500);
    assert_eq!(summary.lines, 2000);
}

#[test]
fn test_fastq_lf_vs_crlf_consistency() {
    let lf = write_temp(sample_fastq(200, "\n").as_bytes());
    let crlf = write_temp(sample_fastq(200, "\r\n").as_bytes());

    let lf_summary = validate(lf.path()).unwrap();
    let crlf_summary = validate(crlf.path()).unwrap();
    assert_eq!(lf_summary.records, crlf_summary.records);
    assert_eq!(lf_summary.lines, crlf_summary.lines);
    assert_eq!(crlf_summary.bytes, lf_summary.bytes + 800);
}

#[test]
fn test_fastq_gzip_stream() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(sample_fastq(300, "\n").as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();

    let decoder = GzDecoder::new(Cursor::new(compressed));
    let summary = validate_reader(decoder).unwrap();
    assert_eq!(summary.records, 300);
}

#[test]
fn test_error_location_in_large_file() {
    let mut content = sample_fastq(1000, "\n");
    content.push_str("@bad\nACGT\n+\n!!!!!\n");
    content.push_str(&sample_fastq(10, "\n"));
    let file = write_temp(content.as_bytes());

    for chunk_size in [7, 4096, 64 * 1024] {
        let validator = Validator::new(ValidatorConfig::default().with_chunk_size(chunk_size));
        let err = validator.validate_path(file.path()).unwrap_err();
        let err = err.validation_error().unwrap();
        assert_eq!(
            err.kind(),
            &ErrorKind::LengthMismatch {
                sequence: 4,
                quality: 5
            }
        );
        assert_eq!(err.record_index(), 1001);
        assert_eq!(err.line_number(), 4004);
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = validate(dir.path().join("absent.fastq")).unwrap_err();
    assert!(matches!(err, FastqFormatError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn test_repeated_runs_are_identical() {
    let file = write_temp(b"@r1\nACGT\n+\n!!!!\n@r2\nAXGT\n+\n!!!!\n");
    let validator = Validator::default();

    let first = validator.validate_path(file.path()).unwrap_err();
    let second = validator.validate_path(file.path()).unwrap_err();
    assert_eq!(first.validation_error(), second.validation_error());

    let reopened = validator.validate_reader(File::open(file.path()).unwrap()).unwrap_err();
    assert_eq!(first.validation_error(), reopened.validation_error());
}
