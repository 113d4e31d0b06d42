//! Register definitions for the CC1101
//! Generated from the CC1101 datasheet (SWRS061I) register map
//!
//! The chip exposes a 6-bit address space split in two:
//! - Configuration registers (0x00 - 0x2E), readable and writable
//! - Status registers (0x30 - 0x3D), read-only
//!
//! Status registers share their numeric addresses with the command strobes in
//! [`crate::commands`]. The chip tells them apart by the burst bit of the header
//! byte: a status register is always read with the burst bit set, a strobe never
//! has it set. The types in this module keep the two spaces apart so neither
//! mistake can be expressed.

use bitflags::bitflags;

mod config;
mod status;

pub use config::*;
pub use status::*;

bitflags! {
    /// Access bits of the SPI header byte
    ///
    /// The header byte is `R/W | BURST | A5..A0`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        /// Read access. Clear for writes.
        const READ = 0x80;
        /// Burst access. Also selects the status space for addresses 0x30 - 0x3D.
        const BURST = 0x40;
    }
}

impl Access {
    /// Single byte write
    pub const WRITE_SINGLE: Access = Access::empty();
    /// Consecutive register write
    pub const WRITE_BURST: Access = Access::BURST;
    /// Single byte read
    pub const READ_SINGLE: Access = Access::READ;
    /// Consecutive register read, or status register read
    pub const READ_BURST: Access = Access::READ.union(Access::BURST);

    /// Builds the header byte for the given 6-bit address.
    pub const fn header(self, address: u8) -> u8 {
        (address & 0x3F) | self.bits()
    }
}

/// Writable registers
///
/// All configuration registers plus the PA table and the FIFO, which share the
/// same write access path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// GDO2 output pin configuration
    Iocfg2 = 0x00,
    /// GDO1 output pin configuration
    Iocfg1 = 0x01,
    /// GDO0 output pin configuration
    Iocfg0 = 0x02,
    /// RX FIFO and TX FIFO thresholds
    Fifothr = 0x03,
    /// Sync word, high byte
    Sync1 = 0x04,
    /// Sync word, low byte
    Sync0 = 0x05,
    /// Packet length
    Pktlen = 0x06,
    /// Packet automation control
    Pktctrl1 = 0x07,
    /// Packet automation control
    Pktctrl0 = 0x08,
    /// Device address
    Addr = 0x09,
    /// Channel number
    Channr = 0x0A,
    /// Frequency synthesizer control
    Fsctrl1 = 0x0B,
    /// Frequency synthesizer control
    Fsctrl0 = 0x0C,
    /// Frequency control word, high byte
    Freq2 = 0x0D,
    /// Frequency control word, middle byte
    Freq1 = 0x0E,
    /// Frequency control word, low byte
    Freq0 = 0x0F,
    /// Modem configuration
    Mdmcfg4 = 0x10,
    /// Modem configuration
    Mdmcfg3 = 0x11,
    /// Modem configuration
    Mdmcfg2 = 0x12,
    /// Modem configuration
    Mdmcfg1 = 0x13,
    /// Modem configuration
    Mdmcfg0 = 0x14,
    /// Modem deviation setting
    Deviatn = 0x15,
    /// Main radio control state machine configuration
    Mcsm2 = 0x16,
    /// Main radio control state machine configuration
    Mcsm1 = 0x17,
    /// Main radio control state machine configuration
    Mcsm0 = 0x18,
    /// Frequency offset compensation configuration
    Foccfg = 0x19,
    /// Bit synchronization configuration
    Bscfg = 0x1A,
    /// AGC control
    Agcctrl2 = 0x1B,
    /// AGC control
    Agcctrl1 = 0x1C,
    /// AGC control
    Agcctrl0 = 0x1D,
    /// High byte event 0 timeout
    Worevt1 = 0x1E,
    /// Low byte event 0 timeout
    Worevt0 = 0x1F,
    /// Wake on radio control
    Worctrl = 0x20,
    /// Front end RX configuration
    Frend1 = 0x21,
    /// Front end TX configuration
    Frend0 = 0x22,
    /// Frequency synthesizer calibration
    Fscal3 = 0x23,
    /// Frequency synthesizer calibration
    Fscal2 = 0x24,
    /// Frequency synthesizer calibration
    Fscal1 = 0x25,
    /// Frequency synthesizer calibration
    Fscal0 = 0x26,
    /// RC oscillator configuration
    Rcctrl1 = 0x27,
    /// RC oscillator configuration
    Rcctrl0 = 0x28,
    /// Frequency synthesizer calibration control
    Fstest = 0x29,
    /// Production test
    Ptest = 0x2A,
    /// AGC test
    Agctest = 0x2B,
    /// Various test settings
    Test2 = 0x2C,
    /// Various test settings
    Test1 = 0x2D,
    /// Various test settings
    Test0 = 0x2E,
    /// Power amplifier output table (8 bytes)
    PaTable = 0x3E,
    /// TX FIFO on write, RX FIFO on read
    Fifo = 0x3F,
}

impl Register {
    /// Raw 6-bit address
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Read-only status registers (0x30 - 0x3D)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StatusRegister {
    /// Part number
    PartNum = 0x30,
    /// Current version number
    Version = 0x31,
    /// Frequency offset estimate
    FreqEst = 0x32,
    /// Demodulator estimate for link quality
    Lqi = 0x33,
    /// Received signal strength indication
    Rssi = 0x34,
    /// Main radio control state machine state
    MarcState = 0x35,
    /// High byte of WOR timer
    WorTime1 = 0x36,
    /// Low byte of WOR timer
    WorTime0 = 0x37,
    /// Current GDOx status and packet status
    PktStatus = 0x38,
    /// Current setting from PLL calibration module
    VcoVcDac = 0x39,
    /// Underflow and number of bytes in the TX FIFO
    TxBytes = 0x3A,
    /// Overflow and number of bytes in the RX FIFO
    RxBytes = 0x3B,
    /// Last RC oscillator calibration result
    RcCtrl1Status = 0x3C,
    /// Last RC oscillator calibration result
    RcCtrl0Status = 0x3D,
}

impl StatusRegister {
    /// Raw 6-bit address
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Registers affected by the SPI read synchronization erratum.
    ///
    /// See CC1101 errata (SWRZ020) section "SPI read synchronization issue":
    /// a read of these may return a corrupt value if the register changes
    /// while it is being read, so two consecutive reads must agree.
    pub const fn needs_double_read(self) -> bool {
        matches!(
            self,
            Self::FreqEst
                | Self::MarcState
                | Self::RxBytes
                | Self::TxBytes
                | Self::WorTime0
                | Self::WorTime1
        )
    }

    pub(crate) const fn from_addr(addr: u8) -> Option<Self> {
        Some(match addr {
            0x30 => Self::PartNum,
            0x31 => Self::Version,
            0x32 => Self::FreqEst,
            0x33 => Self::Lqi,
            0x34 => Self::Rssi,
            0x35 => Self::MarcState,
            0x36 => Self::WorTime1,
            0x37 => Self::WorTime0,
            0x38 => Self::PktStatus,
            0x39 => Self::VcoVcDac,
            0x3A => Self::TxBytes,
            0x3B => Self::RxBytes,
            0x3C => Self::RcCtrl1Status,
            0x3D => Self::RcCtrl0Status,
            _ => return None,
        })
    }
}

/// A readable address in either space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// Configuration space
    Config(Register),
    /// Status space
    Status(StatusRegister),
}

impl Address {
    /// Header byte for a single read of this register
    pub const fn read_header(self) -> u8 {
        match self {
            Self::Config(reg) => Access::READ_SINGLE.header(reg.addr()),
            Self::Status(reg) => Access::READ_BURST.header(reg.addr()),
        }
    }

    /// Whether reads must be repeated until two consecutive values agree
    pub const fn needs_double_read(self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Status(reg) => reg.needs_double_read(),
        }
    }
}

impl From<Register> for Address {
    fn from(reg: Register) -> Self {
        Self::Config(reg)
    }
}

impl From<StatusRegister> for Address {
    fn from(reg: StatusRegister) -> Self {
        Self::Status(reg)
    }
}
