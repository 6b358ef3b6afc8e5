//! Cargo build script: generates the PGN catalog table.
//!
//! Reads the bundled manifest (`build_core/var/pgn_manifest.json`, which
//! PGNs to generate) and the bundled PGN database
//! (`build_core/var/canboat.json`, a curated offline subset of the
//! CANboat project's database) and emits a `PGN_TABLE: &[PgnInfo]` constant
//! that `src/catalog.rs` pulls in via `include!`. Nothing is fetched over
//! the network; both inputs ship with the crate.
mod build_core;
use crate::build_core::{conf::*, domain::Manifest, errors::BuildError, gen_catalog};

use std::path::PathBuf;

fn main() -> Result<(), BuildError> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build_core/var/pgn_manifest.json");
    println!("cargo:rerun-if-changed=build_core/var/canboat.json");

    let manifest_path = PathBuf::from(PGN_MANIFEST_PATH);
    let manifest_string =
        std::fs::read_to_string(&manifest_path).map_err(|e| BuildError::ReadFile {
            path: manifest_path,
            source: e,
        })?;
    let manifest: Manifest = serde_json::from_str(&manifest_string)?;

    let database_path = PathBuf::from(PGN_DATABASE_PATH);
    let database_string =
        std::fs::read_to_string(&database_path).map_err(|e| BuildError::ReadFile {
            path: database_path,
            source: e,
        })?;
    let database: serde_json::Value = serde_json::from_str(&database_string)?;

    let catalog_source = gen_catalog::generate(&manifest, &database)?;

    let out_dir = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let catalog_path = PathBuf::from(out_dir).join(OUT_DIR_CATALOG_FILE_NAME);
    std::fs::write(&catalog_path, &catalog_source).map_err(|e| BuildError::WriteFile {
        path: catalog_path,
        source: e,
    })?;

    Ok(())
}
