//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (JSON parsing, code generation, etc.).
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("OUT_DIR error: {source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing a JSON document (manifest or PGN database).
    #[error("invalid JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Provided path is invalid or missing.
    #[error("failed to read path {path}")]
    ReadPath { path: &'static str },

    /// Failed to write the generated code to disk.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest PGN is missing from the bundled database.
    #[error("PGN {pgn} listed in the manifest has no entry in the PGN database")]
    UnknownManifestPgn { pgn: u32 },

    /// A field references a lookup table that isn't defined in the database.
    #[error("PGN {pgn} field '{field}' references unknown lookup table '{lookup}'")]
    UnknownLookup {
        pgn: u32,
        field: String,
        lookup: String,
    },

    /// A `Type` string on a PGN entry isn't one of the known packet types.
    #[error("PGN {pgn} has unknown packet type '{kind}'")]
    UnknownPacketType { pgn: u32, kind: String },

    /// A `FieldType` string on a field isn't one of the known field types.
    #[error("PGN {pgn} field '{field}' has unknown field type '{kind}'")]
    UnknownFieldType {
        pgn: u32,
        field: String,
        kind: String,
    },
}
