//! Received packet parsing

use super::codec;
use super::command::{CommandSet, LogicalCommand, Signature};
use super::frame::DeviceIdentity;

/// Length of a received packet in fixed length RX mode
pub const RX_PACKET_LEN: usize = 63;

/// A packet overheard from a remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedPacket {
    pub device_type: u8,
    pub device_id: [u8; 3],
    /// Sender's rolling counter
    pub counter: u8,
    /// Command bytes from the even bit slots
    pub command_bytes: Signature,
    /// Command bytes from the odd bit slots
    pub check_bytes: Signature,
    /// [`LogicalCommand::Unknown`] when the check bytes disagree or no signature matches
    pub command: LogicalCommand,
}

impl DecodedPacket {
    /// Decodes and interprets `message`, the bytes following the sync word.
    ///
    /// Returns `None` if the message is too short to hold a header and
    /// command bytes, or too long to decode.
    pub fn parse(message: &[u8], commands: &CommandSet) -> Option<Self> {
        let decoded = codec::decode(message).ok()?;
        let data = decoded.data.as_slice();
        let check = decoded.check.as_slice();

        let identity = DeviceIdentity::new(*data.first()?, [*data.get(1)?, *data.get(2)?, *data.get(3)?]);
        let counter = *data.get(4)?;

        let offset = identity.signature_offset();
        let command_bytes: Signature = data.get(offset..offset + 6)?.try_into().ok()?;
        let check_bytes: Signature = check.get(offset..offset + 6)?.try_into().ok()?;

        let command = if command_bytes == check_bytes {
            commands.find(&command_bytes)
        } else {
            LogicalCommand::Unknown
        };

        Some(Self {
            device_type: identity.device_type,
            device_id: identity.device_id,
            counter,
            command_bytes,
            check_bytes,
            command,
        })
    }

    /// Sender identity
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.device_type, self.device_id)
    }

    pub fn is_known(&self) -> bool {
        self.command != LogicalCommand::Unknown
    }
}
