//! Payload layout and wire frame assembly

use heapless::Vec;

use super::codec::{self, CapacityError};
use super::command::{CommandSet, LogicalCommand, Signature};

/// Preamble, transmitter sync marker and the two bytes every packet opens with
pub const PREFIX: [u8; 14] = [170, 170, 170, 170, 170, 170, 170, 171, 254, 0, 179, 42, 171, 42];

/// Sync word the receiver searches for; bytes 10 and 11 of [`PREFIX`]
pub const SYNC_WORD: [u8; 2] = [179, 42];

/// Offset in [`PREFIX`] of the first byte the receiver delivers
pub const RX_START: usize = 12;

/// Closes steady-state command frames
pub const TERMINATOR_COMMAND: u8 = 172;

/// Closes JOIN and LEAVE frames
pub const TERMINATOR_BINDING: u8 = 202;

/// Trailing padding after the terminator
pub const TRAILER: [u8; 7] = [170; 7];

/// Largest frame any command produces
pub const MAX_FRAME: usize = 80;

/// Offset of the signature in payloads and received packets
pub const SIGNATURE_OFFSET: usize = 5;

/// Signature offset for device types with two extra header bytes
pub const SIGNATURE_OFFSET_EXTENDED: usize = 7;

/// Fixed JOIN payload bytes between the two copies of the remote id
const JOIN_MARKER: [u8; 3] = [1, 16, 224];

/// Who a frame claims to be from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    /// Remote model, 22 is an RFT remote
    pub device_type: u8,
    pub device_id: [u8; 3],
}

impl DeviceIdentity {
    pub const fn new(device_type: u8, device_id: [u8; 3]) -> Self {
        Self {
            device_type,
            device_id,
        }
    }

    /// Offset of the command bytes in packets sent by this kind of device
    pub const fn signature_offset(&self) -> usize {
        match self.device_type {
            24 | 28 => SIGNATURE_OFFSET_EXTENDED,
            _ => SIGNATURE_OFFSET,
        }
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::new(22, [116, 233, 94])
    }
}

/// Decoded payload of an outgoing command, checksum included
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Payload {
    bytes: Vec<u8, { codec::MAX_PAYLOAD }>,
}

impl Payload {
    /// Builds the payload for `command`.
    ///
    /// Steady-state commands carry header and signature. JOIN appends the
    /// remote id, a fixed marker and the id again; LEAVE appends the id once.
    pub fn new(
        command: LogicalCommand,
        signature: &Signature,
        identity: &DeviceIdentity,
        counter: u8,
    ) -> Result<Self, CapacityError> {
        let mut bytes = Vec::new();
        bytes.push(identity.device_type).map_err(|_| CapacityError)?;
        bytes
            .extend_from_slice(&identity.device_id)
            .map_err(|_| CapacityError)?;
        bytes.push(counter).map_err(|_| CapacityError)?;
        bytes
            .extend_from_slice(signature)
            .map_err(|_| CapacityError)?;

        match command {
            LogicalCommand::Join => {
                for part in [&identity.device_id, &JOIN_MARKER, &identity.device_id] {
                    bytes.extend_from_slice(part).map_err(|_| CapacityError)?;
                }
            }
            LogicalCommand::Leave => {
                bytes
                    .extend_from_slice(&identity.device_id)
                    .map_err(|_| CapacityError)?;
            }
            _ => {}
        }

        let checksum = codec::checksum(&bytes);
        bytes.push(checksum).map_err(|_| CapacityError)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn checksum(&self) -> u8 {
        self.bytes.last().copied().unwrap_or(0)
    }
}

/// Complete over-the-air frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME>,
}

impl Frame {
    /// Assembles the frame for `command`.
    ///
    /// Returns `None` for [`LogicalCommand::Unknown`], which has no signature.
    pub fn for_command(
        command: LogicalCommand,
        commands: &CommandSet,
        identity: &DeviceIdentity,
        counter: u8,
    ) -> Option<Self> {
        let signature = commands.signature(command)?;
        let payload = Payload::new(command, signature, identity, counter).ok()?;
        Self::from_payload(&payload, command.is_binding()).ok()
    }

    /// Encodes `payload` between prefix and terminator.
    pub fn from_payload(payload: &Payload, binding: bool) -> Result<Self, CapacityError> {
        let mut bytes: Vec<u8, MAX_FRAME> = Vec::new();
        bytes.extend_from_slice(&PREFIX).map_err(|_| CapacityError)?;
        codec::Encoder::new().encode_into(payload.as_bytes(), &mut bytes)?;

        let terminator = if binding {
            TERMINATOR_BINDING
        } else {
            TERMINATOR_COMMAND
        };
        bytes.push(terminator).map_err(|_| CapacityError)?;
        bytes.extend_from_slice(&TRAILER).map_err(|_| CapacityError)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The part of the frame a receiver synchronised on [`SYNC_WORD`] delivers
    pub fn received_part(&self) -> &[u8] {
        &self.bytes[RX_START..]
    }
}
