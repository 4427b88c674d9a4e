//! Labels manifest reader and writer.
//!
//! The manifest is a two-column CSV with the header `file,species` and one
//! row per flattened sample. There is no index column.
//!
//! Rows are accumulated in memory and serialized once at the end of a run,
//! in the order they were pushed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FlatlabelError;

/// A single `(file, species)` row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Base name of the sample file, now directly under the train root.
    pub file: String,
    /// Label derived from the category directory name.
    pub species: String,
}

impl SampleRecord {
    pub fn new(file: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            species: species.into(),
        }
    }
}

/// Ordered collection of sample records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub records: Vec<SampleRecord>,
}

impl Manifest {
    /// Creates an empty manifest.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, record: SampleRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Writes a manifest to a CSV file.
///
/// The header row is always written, even for an empty manifest.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), FlatlabelError> {
    let file = File::create(path).map_err(|source| FlatlabelError::CreateManifest {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let csv_writer = serialize_records(writer, manifest, path)?;

    csv_writer
        .into_inner()
        .map_err(|e| FlatlabelError::Io(e.into_error()))?
        .flush()
        .map_err(FlatlabelError::Io)?;

    Ok(())
}

/// Writes a manifest to a CSV string.
///
/// Useful for testing without file I/O.
pub fn to_manifest_string(manifest: &Manifest) -> Result<String, FlatlabelError> {
    let dummy_path = Path::new("<string>");
    let csv_writer = serialize_records(Vec::new(), manifest, dummy_path)?;

    let bytes = csv_writer
        .into_inner()
        .map_err(|e| FlatlabelError::Io(e.into_error()))?;

    String::from_utf8(bytes).map_err(|e| FlatlabelError::ManifestInvalid {
        path: dummy_path.to_path_buf(),
        message: format!("Invalid UTF-8 in output: {}", e),
    })
}

/// Reads a manifest from a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be opened or a row does not have
/// the `file` and `species` columns.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use flatlabel::manifest::read_manifest;
///
/// let manifest = read_manifest(Path::new("labels.csv"))?;
/// println!("{} samples", manifest.len());
/// # Ok::<(), flatlabel::FlatlabelError>(())
/// ```
pub fn read_manifest(path: &Path) -> Result<Manifest, FlatlabelError> {
    let file = File::open(path).map_err(FlatlabelError::Io)?;
    parse_records(BufReader::new(file), path)
}

/// Reads a manifest from a CSV string.
pub fn from_manifest_str(csv_str: &str) -> Result<Manifest, FlatlabelError> {
    parse_records(csv_str.as_bytes(), Path::new("<string>"))
}

fn serialize_records<W: Write>(
    writer: W,
    manifest: &Manifest,
    path: &Path,
) -> Result<csv::Writer<W>, FlatlabelError> {
    // The header comes from serde field names, which `serialize` only emits
    // alongside the first row. Write it explicitly so empty manifests keep it.
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(["file", "species"])
        .map_err(|source| FlatlabelError::ManifestWrite {
            path: path.to_path_buf(),
            source,
        })?;

    for record in &manifest.records {
        csv_writer
            .serialize(record)
            .map_err(|source| FlatlabelError::ManifestWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    Ok(csv_writer)
}

fn parse_records<R: std::io::Read>(reader: R, path: &Path) -> Result<Manifest, FlatlabelError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut manifest = Manifest::new();

    for result in csv_reader.deserialize() {
        let record: SampleRecord = result.map_err(|source| FlatlabelError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.push(record);
    }

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_still_has_header() {
        let csv = to_manifest_string(&Manifest::new()).expect("serialize");
        assert_eq!(csv, "file,species\n");
    }

    #[test]
    fn rows_keep_push_order() {
        let mut manifest = Manifest::new();
        manifest.push(SampleRecord::new("b.png", "dog"));
        manifest.push(SampleRecord::new("a.png", "cat"));

        let csv = to_manifest_string(&manifest).expect("serialize");
        assert_eq!(csv, "file,species\nb.png,dog\na.png,cat\n");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut manifest = Manifest::new();
        manifest.push(SampleRecord::new("x,1.png", "Red_Fox"));

        let csv = to_manifest_string(&manifest).expect("serialize");
        assert_eq!(csv, "file,species\n\"x,1.png\",Red_Fox\n");

        let parsed = from_manifest_str(&csv).expect("parse");
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn missing_species_column_is_a_parse_error() {
        let err = from_manifest_str("file\na.png\n").unwrap_err();
        assert!(matches!(err, FlatlabelError::ManifestParse { .. }));
    }

    #[test]
    fn write_into_missing_directory_names_the_manifest() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("missing").join("labels.csv");

        let err = write_manifest(&path, &Manifest::new()).unwrap_err();
        match err {
            FlatlabelError::CreateManifest { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn write_then_read_from_disk() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("labels.csv");

        let mut manifest = Manifest::new();
        manifest.push(SampleRecord::new("a.png", "cat"));
        write_manifest(&path, &manifest).expect("write manifest");

        let raw = std::fs::read_to_string(&path).expect("read back");
        assert_eq!(raw, "file,species\na.png,cat\n");
        assert_eq!(read_manifest(&path).expect("parse"), manifest);
    }
}
