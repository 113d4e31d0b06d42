//! Chip status byte
//!
//! Returned on SO during the header byte of every transaction.
//!
//! # Status Byte Format
//! - Bit 7: CHIP_RDYn, high until power and crystal have stabilised
//! - Bits 6:4: Main state
//! - Bits 3:0: FIFO_BYTES_AVAILABLE, free TX FIFO bytes after a write
//!   header, available RX FIFO bytes after a read header

/// Main state carried in bits 6:4 of the status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipState {
    /// IDLE state, also reported for some transitional states
    Idle = 0,
    /// Receive mode
    Rx = 1,
    /// Transmit mode
    Tx = 2,
    /// Fast TX ready
    Fstxon = 3,
    /// Frequency synthesizer calibration is running
    Calibrate = 4,
    /// PLL is settling
    Settling = 5,
    /// RX FIFO has overflowed. Read out any useful data, then flush with SFRX
    RxFifoOverflow = 6,
    /// TX FIFO has underflowed. Acknowledge with SFTX
    TxFifoUnderflow = 7,
}

impl From<u8> for ChipState {
    fn from(value: u8) -> Self {
        match value & 0x7 {
            0 => Self::Idle,
            1 => Self::Rx,
            2 => Self::Tx,
            3 => Self::Fstxon,
            4 => Self::Calibrate,
            5 => Self::Settling,
            6 => Self::RxFifoOverflow,
            _ => Self::TxFifoUnderflow,
        }
    }
}

/// Decoded chip status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipStatus {
    raw: u8,
}

impl ChipStatus {
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Raw status byte
    pub const fn bits(&self) -> u8 {
        self.raw
    }

    /// CHIP_RDYn is low
    pub const fn is_ready(&self) -> bool {
        self.raw & 0x80 == 0
    }

    pub fn state(&self) -> ChipState {
        ChipState::from(self.raw >> 4)
    }

    /// Free bytes in the TX FIFO or available bytes in the RX FIFO,
    /// saturating at 15
    pub const fn fifo_bytes(&self) -> u8 {
        self.raw & 0x0F
    }
}

impl From<u8> for ChipStatus {
    fn from(raw: u8) -> Self {
        Self::new(raw)
    }
}
