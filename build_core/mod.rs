//! Workspace for the build script: data structures and the catalog generator.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_catalog;
pub mod name_helpers;
