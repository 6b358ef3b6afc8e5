//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Manifest containing the list of PGNs to generate.
pub(crate) const PGN_MANIFEST_PATH: &str = "build_core/var/pgn_manifest.json";
/// Curated offline PGN database (PGNs + lookup tables), bundled with the crate.
pub(crate) const PGN_DATABASE_PATH: &str = "build_core/var/canboat.json";
/// Generated catalog file name (written to `OUT_DIR`), pulled in by
/// `src/catalog.rs` via `include!`.
pub(crate) const OUT_DIR_CATALOG_FILE_NAME: &str = "generated_catalog.rs";
