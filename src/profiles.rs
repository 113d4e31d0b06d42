//! Radio profiles
//!
//! The two register programs the protocol uses, as data. [`Session`]
//! runs them step by step through [`Device`].
//!
//! The transmit program first brings the chip up in synchronous serial mode
//! the way the stock remote does, then switches it to plain FIFO mode with
//! a fixed packet length. The frame carries its own preamble and sync marker,
//! so the radio adds nothing.
//!
//! The receive program calibrates the synthesizer, configures the demodulator
//! and finally arms fixed length packet reception on sync word 179/42.
//!
//! [`Session`]: crate::Session
//! [`Device`]: crate::Device

use crate::commands::Strobe;
use crate::protocol::RX_PACKET_LEN;
use crate::registers::{
    Frequency, MarcState, ModemConfig2, PaTable, PacketControl0, PacketLength, Register, SyncMode,
    SyncWord,
};

/// One step of a register program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Command strobe
    Strobe(Strobe),
    /// Raw single register write
    Write(Register, u8),
    /// Power table burst write
    PaTable(PaTable),
    /// Carrier, FREQ2 to FREQ0 in one burst
    Frequency(Frequency),
    /// Sync word, SYNC1 and SYNC0 in one burst
    SyncWord(SyncWord),
    /// Packet length
    PacketLength(PacketLength),
    /// PKTCTRL0
    PacketControl(PacketControl0),
    /// MDMCFG2
    Modem(ModemConfig2),
    /// Busy wait in microseconds
    Pause(u32),
    /// Poll MARCSTATE until it reports the state
    WaitFor(MarcState),
    /// Poll MARCSTATE until RX, flushing the RX FIFO on overflow
    AwaitRx,
}

use Register::*;
use Step::{Pause, Strobe as S, WaitFor, Write as W};

/// GDO pins in high impedance
const GDO_TRISTATE: u8 = 0x2E;

/// Carrier of the protocol, 868.3 MHz
pub const CARRIER: Frequency = Frequency::from_hz(868_300_000);

/// Data rate and deviation shared by both directions
const DATA_RATE: [Step; 3] = [W(Mdmcfg4, 0x5A), W(Mdmcfg3, 0x83), W(Deviatn, 0x50)];

/// Power table for transmitting
pub const TX_PA_TABLE: PaTable = PaTable {
    levels: [0x6F, 0x26, 0x2E, 0x8C, 0x87, 0xCD, 0xC7, 0xC0],
};

/// Power table loaded before receiving
pub const RX_PA_TABLE: PaTable = PaTable {
    levels: [0x6F, 0x26, 0x2E, 0x7F, 0x8A, 0x84, 0xCA, 0xC4],
};

/// Sync word of the protocol
pub const SYNC: SyncWord = SyncWord { value: 0xB32A };

/// Takes the chip down and resets it ahead of the transmit setup
pub const TX_POWER_CYCLE: &[Step] = &[
    S(Strobe::Sidle),
    Pause(1),
    W(Iocfg0, GDO_TRISTATE),
    Pause(1),
    W(Iocfg1, GDO_TRISTATE),
    Pause(1),
    S(Strobe::Sidle),
    S(Strobe::Spwd),
    Pause(2),
    S(Strobe::Sres),
    Pause(1),
];

/// Synchronous serial transmit setup
pub const TX_SERIAL: &[Step] = &[
    W(Iocfg0, GDO_TRISTATE),
    Step::Frequency(CARRIER),
    W(Mdmcfg4, 0x5A),
    W(Mdmcfg3, 0x83),
    // 2-FSK, no Manchester, no preamble or sync
    W(Mdmcfg2, 0x00),
    W(Mdmcfg1, 0x22),
    W(Mdmcfg0, 0xF8),
    W(Channr, 0x00),
    W(Deviatn, 0x50),
    // PA table index 7
    W(Frend0, 0x17),
    W(Mcsm0, 0x18),
    W(Fscal3, 0xA9),
    W(Fscal2, 0x2A),
    W(Fscal1, 0x00),
    W(Fscal0, 0x11),
    W(Fstest, 0x59),
    W(Test2, 0x81),
    W(Test1, 0x35),
    W(Test0, 0x0B),
    // Synchronous serial, infinite length
    W(Pktctrl0, 0x12),
    W(Addr, 0x00),
    W(Pktlen, 0xFF),
    Step::PaTable(TX_PA_TABLE),
    S(Strobe::Sidle),
    S(Strobe::Sidle),
    DATA_RATE[0],
    DATA_RATE[1],
    DATA_RATE[2],
    // GDO0 as serial data input, GDO1 as serial clock
    W(Iocfg0, 0x2D),
    W(Iocfg1, 0x0B),
    S(Strobe::Stx),
    S(Strobe::Sidle),
    DATA_RATE[0],
    DATA_RATE[1],
    DATA_RATE[2],
];

/// Switch from serial to FIFO transmission. Followed by the frame length.
pub const TX_FIFO: &[Step] = &[
    W(Iocfg0, GDO_TRISTATE),
    W(Iocfg1, GDO_TRISTATE),
    Step::PacketControl(PacketControl0::FIFO_FIXED),
    W(Pktctrl1, 0x00),
];

/// Puts the chip back to sleep after transmitting
pub const TX_SHUTDOWN: &[Step] = &[
    S(Strobe::Sidle),
    Pause(1),
    W(Iocfg0, GDO_TRISTATE),
    W(Iocfg1, GDO_TRISTATE),
    S(Strobe::Sidle),
    S(Strobe::Spwd),
];

/// Reset and first synthesizer calibration
pub const RX_CALIBRATE: &[Step] = &[
    S(Strobe::Sres),
    W(Test0, 0x09),
    W(Fscal2, 0x00),
    Step::PaTable(RX_PA_TABLE),
    S(Strobe::Scal),
    WaitFor(MarcState::Idle),
];

/// Demodulator setup
pub const RX_MODEM: &[Step] = &[
    W(Fscal2, 0x00),
    // No auto calibration
    W(Mcsm0, 0x18),
    Step::Frequency(CARRIER),
    W(Iocfg0, GDO_TRISTATE),
    // GDO2 asserts on sync word, deasserts at end of packet
    W(Iocfg2, 0x06),
    W(Fsctrl1, 0x06),
    W(Fsctrl0, 0x00),
    W(Mdmcfg4, 0x5A),
    W(Mdmcfg3, 0x83),
    W(Mdmcfg2, 0x00),
    W(Mdmcfg1, 0x22),
    W(Mdmcfg0, 0xF8),
    W(Channr, 0x00),
    W(Deviatn, 0x50),
    W(Frend1, 0x56),
    W(Frend0, 0x17),
    W(Mcsm0, 0x18),
    W(Foccfg, 0x16),
    W(Bscfg, 0x6C),
    W(Agcctrl2, 0x43),
    W(Agcctrl1, 0x40),
    W(Agcctrl0, 0x91),
    W(Fscal3, 0xE9),
    W(Fscal2, 0x2A),
    W(Fscal1, 0x00),
    W(Fscal0, 0x11),
    W(Fstest, 0x59),
    W(Test2, 0x81),
    W(Test1, 0x35),
    W(Test0, 0x0B),
    // Append status bytes
    W(Pktctrl1, 0x04),
    // Asynchronous serial, infinite length
    W(Pktctrl0, 0x32),
    W(Addr, 0x00),
    W(Pktlen, 0xFF),
    W(Test0, 0x09),
    S(Strobe::Scal),
    WaitFor(MarcState::Idle),
    W(Mcsm0, 0x18),
    S(Strobe::Sidle),
    S(Strobe::Sidle),
    W(Mdmcfg2, 0x00),
    // GDO0 as serial data output
    W(Iocfg0, 0x0D),
    S(Strobe::Srx),
    WaitFor(MarcState::Rx),
];

/// Arms fixed length reception. Run after [`RX_MODEM`] and after every packet.
pub const RX_ARM: &[Step] = &[
    S(Strobe::Sidle),
    DATA_RATE[0],
    DATA_RATE[1],
    DATA_RATE[2],
    Step::PacketLength(PacketLength {
        length: RX_PACKET_LEN as u8,
    }),
    Step::PacketControl(PacketControl0::FIFO_FIXED),
    Step::SyncWord(SYNC),
    Step::Modem(ModemConfig2 {
        sync_mode: SyncMode::Bits16Of16,
    }),
    W(Pktctrl1, 0x00),
    S(Strobe::Srx),
    Step::AwaitRx,
];
