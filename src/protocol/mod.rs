//! High-level components of the NMEA 2000 protocol: CAN identifier packing
//! and Fast Packet transport. PGN field layouts live in the catalog; lookup
//! tables are generated alongside it.
pub mod transport;
