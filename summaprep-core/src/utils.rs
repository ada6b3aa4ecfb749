use std::ffi::OsStr;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde_json::Value;

use crate::errors::{CoreError, CoreResult};
use crate::models::{ProcessedExample, RawExample};

fn is_gzipped(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("gz"))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> CoreResult<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped(path) {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Get a writer for either a gzip'd or non-gzip'd file, creating parent
/// directories as needed.
///
/// # Arguments
///
/// - path: path to the file to write
///
pub fn get_dynamic_writer(path: &Path) -> CoreResult<BufWriter<Box<dyn Write>>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let file: Box<dyn Write> = match is_gzipped(path) {
        true => Box::new(GzEncoder::new(file, Compression::default())),
        false => Box::new(file),
    };

    Ok(BufWriter::new(file))
}

///
/// Read a JSON-lines dataset (`.jsonl` or `.jsonl.gz`) into raw examples.
/// Blank lines are skipped. Any line that is not valid JSON or lacks one of the
/// text fields fails the whole read with its 1-based line number.
///
/// # Arguments
///
/// - path: path to the dataset file
///
pub fn read_raw_examples<P: AsRef<Path>>(path: P) -> CoreResult<Vec<RawExample>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut examples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let invalid = |message: String| CoreError::InvalidRecord {
            line: idx + 1,
            message,
        };

        let value: Value = serde_json::from_str(&line).map_err(|e| invalid(e.to_string()))?;
        let example = RawExample::try_from(&value).map_err(|e| invalid(e.to_string()))?;
        examples.push(example);
    }

    Ok(examples)
}

///
/// Read processed examples previously written with [write_processed_examples].
///
pub fn read_processed_examples<P: AsRef<Path>>(path: P) -> CoreResult<Vec<ProcessedExample>> {
    let reader = get_dynamic_reader(path.as_ref())?;
    let mut examples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let example = serde_json::from_str(&line).map_err(|e| CoreError::InvalidRecord {
            line: idx + 1,
            message: e.to_string(),
        })?;
        examples.push(example);
    }

    Ok(examples)
}

///
/// Write processed examples as JSON lines, gzip'd when the path ends in `.gz`.
///
pub fn write_processed_examples<P: AsRef<Path>>(
    path: P,
    examples: &[ProcessedExample],
) -> CoreResult<()> {
    let mut writer = get_dynamic_writer(path.as_ref())?;
    for example in examples {
        serde_json::to_writer(&mut writer, example)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(())
}
