#![cfg_attr(not(test), no_std)]
//! CC1101 Radio Driver and Itho Remote Protocol
//!
//! This crate provides a type-safe interface for the Texas Instruments CC1101
//! sub-GHz transceiver and, on top of it, the RF protocol spoken by Itho
//! ventilation units and their remotes.
//!
//! # Features
//! - Blocking driver over embedded-hal 1.0 SPI, GPIO and delay traits
//! - Command strobes, single and burst register access, typed registers
//! - Workaround for the SPI read synchronization erratum
//! - TX FIFO streaming for frames longer than the FIFO
//! - Bounded polling everywhere through a [`RetryPolicy`]
//! - Itho frame encoder and received packet decoder
//! - Optional `defmt` logging
//!
//! # Architecture
//! The crate is organized into several modules:
//!
//! - [`transport`]: The [`transport::Bus`] the driver talks through
//!   - Chip select, ready line and full duplex exchange
//!   - [`transport::SpiTransport`] over embedded-hal traits
//!
//! - [`device`]: Register and command level interface
//!   - Manages chip select brackets and the chip status byte
//!   - FIFO transfer in both directions
//!
//! - [`registers`]: Register address spaces and typed registers
//! - [`commands`]: Command strobes and the chip status byte
//! - [`protocol`]: Itho packet codec, framing and parsing
//! - [`profiles`]: Register programs for transmitting and receiving
//! - [`session`]: Remote control session built from all of the above
//!
//! # Usage
//! Most applications only need a [`Session`]:
//!
//! 1. Wrap SPI bus, chip select and MISO input in a [`transport::SpiTransport`]
//! 2. Create a [`Session`] with the identity and command bytes of your remote
//! 3. Call [`Session::send`] to control the unit
//! 4. Or call [`Session::enter_receive_mode`] and [`Session::poll`] to listen
//!
//! # Important Notes
//! - The ready check samples MISO; the pin passed to the transport must read
//!   the same line the SPI peripheral uses as MISO
//! - Sending blocks for the whole repeat schedule, up to about 120 ms
//! - Received frames are matched on the last two command bytes only
//!
//! # Example
//! ```no_run
//! use cc1101_itho::{transport::SpiTransport, LogicalCommand, Session, SessionConfig};
//! use embedded_hal::{delay::DelayNs, digital::{InputPin, OutputPin}, spi::SpiBus};
//!
//! fn fan_high<SPI, CS, MISO, D>(spi: SPI, cs: CS, miso: MISO, delay: D)
//! where
//!     SPI: SpiBus,
//!     CS: OutputPin,
//!     MISO: InputPin,
//!     D: DelayNs,
//! {
//!     let Ok(bus) = SpiTransport::new(spi, cs, miso) else { return };
//!     let mut config = SessionConfig::default();
//!     config.identity.device_id = [11, 22, 33];
//!
//!     if let Ok(mut session) = Session::new(bus, delay, config) {
//!         let _ = session.send(LogicalCommand::High);
//!     }
//! }
//! ```

pub mod commands;
pub mod device;
pub mod error;
pub mod profiles;
pub mod protocol;
pub mod registers;
pub mod session;
pub mod transport;

pub use commands::*;
pub use device::{Device, RetryPolicy};
pub use error::Error;
pub use protocol::{CommandSet, DecodedPacket, DeviceIdentity, Frame, LogicalCommand};
pub use registers::*;
pub use session::{Mode, Session, SessionConfig};
