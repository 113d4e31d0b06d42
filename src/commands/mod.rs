//! Command strobes and the chip status byte
//!
//! # Command Strobes
//! A strobe is a single header byte in the 0x30 - 0x3D range with the burst
//! bit clear. It carries no payload; the chip answers with its status byte.
//! - [`Strobe::Sres`] resets the chip
//! - [`Strobe::Srx`] / [`Strobe::Stx`] / [`Strobe::Sidle`] switch the radio state
//! - [`Strobe::Sfrx`] / [`Strobe::Sftx`] flush the FIFOs
//! - [`Strobe::Scal`] runs a frequency synthesizer calibration
//! - [`Strobe::Spwd`] powers down when chip select is released
//!
//! # Status Byte
//! Every SPI transaction returns the chip status byte on SO while the header
//! goes out on SI. See [`ChipStatus`].
//!
//! # Important Notes
//! - SO stays high until the crystal is running; wait for it before clocking
//! - Only flush the RX FIFO in IDLE or RXFIFO_OVERFLOW
//! - Only flush the TX FIFO in IDLE or TXFIFO_UNDERFLOW

mod status;
mod strobe;

pub use status::*;
pub use strobe::*;
