//! Bit-level primitives (`bits`), the field-access contract (`traits`), and
//! the decode/encode dispatch engine (`engine`) built on top of them.
pub mod bits;
pub mod engine;
pub mod traits;
