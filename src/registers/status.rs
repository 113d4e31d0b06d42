//! Typed status registers
//!
//! Read-only registers the driver polls while moving data through the FIFOs
//! and switching radio states. Reads of MARCSTATE, TXBYTES and RXBYTES go
//! through the erratum double-read in [`crate::Device`].

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister};

/// Error type for MARCSTATE values outside the datasheet table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidMarcState(pub u8);

/// Main radio control state machine state
///
/// Finer grained than the 3-bit state carried in the chip status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MarcState {
    Sleep = 0x00,
    Idle = 0x01,
    Xoff = 0x02,
    VcoonMc = 0x03,
    RegonMc = 0x04,
    Mancal = 0x05,
    Vcoon = 0x06,
    Regon = 0x07,
    Startcal = 0x08,
    Bwboost = 0x09,
    FsLock = 0x0A,
    Ifadcon = 0x0B,
    Endcal = 0x0C,
    Rx = 0x0D,
    RxEnd = 0x0E,
    RxRst = 0x0F,
    TxrxSwitch = 0x10,
    RxFifoOverflow = 0x11,
    Fstxon = 0x12,
    Tx = 0x13,
    TxEnd = 0x14,
    RxtxSwitch = 0x15,
    TxFifoUnderflow = 0x16,
}

impl TryFrom<u8> for MarcState {
    type Error = InvalidMarcState;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value & 0x1F {
            0x00 => Self::Sleep,
            0x01 => Self::Idle,
            0x02 => Self::Xoff,
            0x03 => Self::VcoonMc,
            0x04 => Self::RegonMc,
            0x05 => Self::Mancal,
            0x06 => Self::Vcoon,
            0x07 => Self::Regon,
            0x08 => Self::Startcal,
            0x09 => Self::Bwboost,
            0x0A => Self::FsLock,
            0x0B => Self::Ifadcon,
            0x0C => Self::Endcal,
            0x0D => Self::Rx,
            0x0E => Self::RxEnd,
            0x0F => Self::RxRst,
            0x10 => Self::TxrxSwitch,
            0x11 => Self::RxFifoOverflow,
            0x12 => Self::Fstxon,
            0x13 => Self::Tx,
            0x14 => Self::TxEnd,
            0x15 => Self::RxtxSwitch,
            0x16 => Self::TxFifoUnderflow,
            invalid => return Err(InvalidMarcState(invalid)),
        })
    }
}

/// MARCSTATE register (address: 0x35)
#[register(0x35u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioState {
    /// Current state machine state
    pub state: MarcState,
}

/// TXBYTES register (address: 0x3A)
#[register(0x3Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxBytes {
    /// TX FIFO ran empty while transmitting
    pub underflow: bool,
    /// Bytes waiting in the TX FIFO
    pub count: u8,
}

/// RXBYTES register (address: 0x3B)
#[register(0x3Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxBytes {
    /// RX FIFO filled up and dropped data
    pub overflow: bool,
    /// Bytes waiting in the RX FIFO
    pub count: u8,
}

/// PARTNUM register (address: 0x30), 0x00 on every CC1101
#[register(0x30u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartNumber {
    pub value: u8,
}

/// VERSION register (address: 0x31)
///
/// 0x14 on current silicon, 0x04 and 0x17 have also been seen in the field.
#[register(0x31u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipVersion {
    pub value: u8,
}

impl FromByteArray for RadioState {
    type Error = InvalidMarcState;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            state: MarcState::try_from(bytes[0])?,
        })
    }
}

impl FromByteArray for TxBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            underflow: bytes[0] & 0x80 != 0,
            count: bytes[0] & 0x7F,
        })
    }
}

impl FromByteArray for RxBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            overflow: bytes[0] & 0x80 != 0,
            count: bytes[0] & 0x7F,
        })
    }
}

impl FromByteArray for PartNumber {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for ChipVersion {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}
