//! Typed configuration registers
//!
//! Registers the radio profiles program as a unit or whose fields carry
//! meaning worth naming. Everything else is written as a raw byte through
//! [`crate::Device::write_register`].

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Crystal oscillator frequency of the usual CC1101 modules
pub const FXOSC_HZ: u64 = 26_000_000;

/// Sync word register pair (address: 0x04 - 0x05)
///
/// 16-bit word the demodulator searches for when `MDMCFG2.SYNC_MODE` asks
/// for sync word detection. The chip strips it from the received packet.
#[register(0x04u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncWord {
    /// SYNC1 in the high byte, SYNC0 in the low byte
    pub value: u16,
}

impl Default for SyncWord {
    fn default() -> Self {
        Self { value: 0xD391 }
    }
}

/// Packet length register (address: 0x06)
///
/// Packet length in fixed length mode, maximum length in variable length mode.
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketLength {
    /// Length in bytes
    pub length: u8,
}

impl Default for PacketLength {
    fn default() -> Self {
        Self { length: 0xFF }
    }
}

/// Format of RX and TX data, `PKTCTRL0.PKT_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketFormat {
    /// Normal mode, use FIFOs for RX and TX
    Normal = 0,
    /// Synchronous serial mode, data in on GDO0 and data out on GDOx
    SynchronousSerial = 1,
    /// Random TX mode, PN9 generator
    RandomTx = 2,
    /// Asynchronous serial mode
    AsynchronousSerial = 3,
}

/// Packet length configuration, `PKTCTRL0.LENGTH_CONFIG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LengthConfig {
    /// Length configured in [`PacketLength`]
    Fixed = 0,
    /// Length taken from the first byte after the sync word
    Variable = 1,
    /// Infinite packet length
    Infinite = 2,
}

/// Packet automation control register (address: 0x08)
#[register(0x08u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketControl0 {
    /// Data whitening
    pub whitening: bool,
    /// Source and sink of packet data
    pub format: PacketFormat,
    /// CRC calculation in TX and CRC check in RX
    pub crc: bool,
    /// Packet length mode
    pub length: LengthConfig,
}

impl PacketControl0 {
    /// Plain FIFO mode with fixed packet length and no CRC
    pub const FIFO_FIXED: Self = Self {
        whitening: false,
        format: PacketFormat::Normal,
        crc: false,
        length: LengthConfig::Fixed,
    };
}

impl Default for PacketControl0 {
    fn default() -> Self {
        Self {
            whitening: true,
            format: PacketFormat::Normal,
            crc: true,
            length: LengthConfig::Variable,
        }
    }
}

/// Carrier frequency control word (address: 0x0D - 0x0F)
///
/// f_carrier = FXOSC / 2^16 * FREQ[23:0]
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequency {
    /// 22-bit frequency word
    pub word: u32,
}

impl Frequency {
    /// Closest frequency word for a carrier in Hz
    pub const fn from_hz(hz: u64) -> Self {
        let word = ((hz << 16) + FXOSC_HZ / 2) / FXOSC_HZ;
        Self {
            word: (word as u32) & 0x3F_FFFF,
        }
    }

    /// Carrier frequency in Hz, rounded down
    pub const fn hz(&self) -> u64 {
        (self.word as u64 * FXOSC_HZ) >> 16
    }
}

/// Sync word qualifier mode, `MDMCFG2.SYNC_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncMode {
    /// No preamble or sync word
    None = 0,
    /// 15 of 16 sync word bits must match
    Bits15Of16 = 1,
    /// 16 of 16 sync word bits must match
    Bits16Of16 = 2,
    /// 30 of 32 sync word bits must match
    Bits30Of32 = 3,
    /// No sync word, carrier sense above threshold
    CarrierSense = 4,
    /// 15 of 16 plus carrier sense
    Bits15Of16CarrierSense = 5,
    /// 16 of 16 plus carrier sense
    Bits16Of16CarrierSense = 6,
    /// 30 of 32 plus carrier sense
    Bits30Of32CarrierSense = 7,
}

/// Modem configuration register 2 (address: 0x12)
///
/// The other modem fields are left at zero by both radio profiles:
/// 2-FSK, DC blocking filter enabled, no Manchester coding.
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig2 {
    /// Sync word qualifier
    pub sync_mode: SyncMode,
}

/// Power amplifier table (address: 0x3E)
///
/// Eight output power settings; `FREND0.PA_POWER` selects the entry in use.
#[register(0x3Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaTable {
    /// Power settings, index 0 first
    pub levels: [u8; 8],
}

impl FromByteArray for SyncWord {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for SyncWord {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.value.to_be_bytes())
    }
}

impl FromByteArray for PacketLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { length: bytes[0] })
    }
}

impl ToByteArray for PacketLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.length])
    }
}

impl FromByteArray for PacketControl0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let format = match (bytes[0] >> 4) & 0x3 {
            0 => PacketFormat::Normal,
            1 => PacketFormat::SynchronousSerial,
            2 => PacketFormat::RandomTx,
            _ => PacketFormat::AsynchronousSerial,
        };
        // 3 is reserved and behaves as infinite
        let length = match bytes[0] & 0x3 {
            0 => LengthConfig::Fixed,
            1 => LengthConfig::Variable,
            _ => LengthConfig::Infinite,
        };
        Ok(Self {
            whitening: bytes[0] & 0x40 != 0,
            format,
            crc: bytes[0] & 0x04 != 0,
            length,
        })
    }
}

impl ToByteArray for PacketControl0 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.whitening as u8) << 6)
            | ((self.format as u8) << 4)
            | ((self.crc as u8) << 2)
            | self.length as u8])
    }
}

impl FromByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            word: u32::from_be_bytes([0, bytes[0] & 0x3F, bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [_, high, mid, low] = self.word.to_be_bytes();
        Ok([high & 0x3F, mid, low])
    }
}

impl FromByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let sync_mode = match bytes[0] & 0x7 {
            0 => SyncMode::None,
            1 => SyncMode::Bits15Of16,
            2 => SyncMode::Bits16Of16,
            3 => SyncMode::Bits30Of32,
            4 => SyncMode::CarrierSense,
            5 => SyncMode::Bits15Of16CarrierSense,
            6 => SyncMode::Bits16Of16CarrierSense,
            _ => SyncMode::Bits30Of32CarrierSense,
        };
        Ok(Self { sync_mode })
    }
}

impl ToByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.sync_mode as u8])
    }
}

impl FromByteArray for PaTable {
    type Error = Infallible;
    type Array = [u8; 8];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { levels: bytes })
    }
}

impl ToByteArray for PaTable {
    type Error = Infallible;
    type Array = [u8; 8];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.levels)
    }
}
