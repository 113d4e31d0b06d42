//! Command strobe codes

use crate::registers::Access;

/// Command strobe (address 0x30 - 0x3D, burst bit clear)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Strobe {
    /// Reset chip
    Sres = 0x30,
    /// Enable and calibrate frequency synthesizer
    Sfstxon = 0x31,
    /// Turn off crystal oscillator
    Sxoff = 0x32,
    /// Calibrate frequency synthesizer and turn it off
    Scal = 0x33,
    /// Enable RX. Calibrates first if coming from IDLE and MCSM0.FS_AUTOCAL=1
    Srx = 0x34,
    /// Enable TX
    Stx = 0x35,
    /// Exit RX / TX, turn off frequency synthesizer
    Sidle = 0x36,
    /// Start automatic RX polling sequence (wake on radio)
    Swor = 0x38,
    /// Enter power down mode when CSn goes high
    Spwd = 0x39,
    /// Flush the RX FIFO
    Sfrx = 0x3A,
    /// Flush the TX FIFO
    Sftx = 0x3B,
    /// Reset real time clock to Event1 value
    Sworrst = 0x3C,
    /// No operation, returns the status byte
    Snop = 0x3D,
}

impl Strobe {
    /// Header byte for this strobe. The burst bit is never set.
    pub const fn header(self) -> u8 {
        Access::WRITE_SINGLE.header(self as u8)
    }
}
