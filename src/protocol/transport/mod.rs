//! NMEA 2000 transport layer: 29-bit CAN identifier packing/unpacking and
//! Fast Packet reassembly/splitting. No live bus is driven here — frames are
//! plain byte vectors produced from, or consumed into, text-format lines.

pub mod can_id;
pub mod fast_packet;
