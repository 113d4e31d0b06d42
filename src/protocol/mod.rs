//! Itho ventilation remote protocol
//!
//! Frames are sent by the radio as raw bytes; the protocol itself provides
//! preamble, sync marker and DC balance.
//!
//! ```text
//! | 170 x7 | 171 254 0 | 179 42 | 171 42 | interleaved payload | 172 or 202 | 170 x7 |
//!                        sync     first bytes a receiver delivers
//! ```
//!
//! - [`command`]: logical commands and their six byte signatures
//! - [`codec`]: bit interleave encoder and decoder, checksum
//! - [`frame`]: payload layout and frame assembly
//! - [`packet`]: parsing of received packets

pub mod codec;
pub mod command;
pub mod frame;
pub mod packet;

pub use codec::{checksum, decode, encode, verify_checksum, CapacityError};
pub use command::{CommandSet, LogicalCommand, Repeat, Signature};
pub use frame::{DeviceIdentity, Frame, Payload};
pub use packet::{DecodedPacket, RX_PACKET_LEN};
