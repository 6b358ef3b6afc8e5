//! Infrastructure layer: the bit-level codec and the decode/encode engine
//! built on top of it.
pub mod codec;
