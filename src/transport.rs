//! Bus transport
//!
//! The CC1101 talks a 4-wire SPI dialect with two twists a plain
//! [`embedded_hal::spi::SpiDevice`] cannot express:
//! - After chip select goes low the chip holds SO high until its crystal is
//!   running. No clock may be sent before SO drops.
//! - The power-on reset sequence toggles chip select with precise gaps and
//!   no clocking at all.
//!
//! The [`Bus`] trait therefore exposes chip select, the ready signal and the
//! raw exchange separately. [`SpiTransport`] implements it over an
//! [`embedded_hal::spi::SpiBus`], a chip select [`OutputPin`] and an
//! [`InputPin`] wired to the same line as MISO.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

/// Byte shuttling capability the driver is built on
///
/// Implementations do no retries and no interpretation of the bytes.
pub trait Bus {
    type Error;

    /// Pull chip select low
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release chip select
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Whether the chip signals ready (SO low) while selected
    fn is_ready(&mut self) -> Result<bool, Self::Error>;

    /// Full duplex transfer. The bytes in `buf` are clocked out and replaced
    /// by the bytes clocked in.
    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: Bus + ?Sized> Bus for &mut T {
    type Error = T::Error;

    fn select(&mut self) -> Result<(), Self::Error> {
        T::select(self)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        T::deselect(self)
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        T::is_ready(self)
    }

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::exchange(self, buf)
    }
}

/// Errors of [`SpiTransport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError<E> {
    /// SPI transfer failed
    Spi(E),
    /// Chip select pin could not be driven
    ChipSelect,
    /// Ready (MISO) pin could not be read
    ReadyLine,
}

/// [`Bus`] over embedded-hal SPI and GPIO traits
///
/// The SPI bus must be configured for mode 0, MSB first, at most 10 MHz
/// (6.5 MHz for burst access).
pub struct SpiTransport<SPI, CS, MISO> {
    spi: SPI,
    cs: CS,
    miso: MISO,
}

impl<SPI, CS, MISO> SpiTransport<SPI, CS, MISO>
where
    CS: OutputPin,
{
    /// Creates a transport and releases chip select.
    ///
    /// # Arguments
    /// * `spi` - Exclusively owned SPI bus
    /// * `cs` - Chip select, active low
    /// * `miso` - Input pin sampling the MISO line
    pub fn new(spi: SPI, mut cs: CS, miso: MISO) -> Result<Self, CS::Error> {
        cs.set_high()?;
        Ok(Self { spi, cs, miso })
    }
}

impl<SPI, CS, MISO> SpiTransport<SPI, CS, MISO> {
    /// Releases the SPI bus and pins.
    pub fn release(self) -> (SPI, CS, MISO) {
        (self.spi, self.cs, self.miso)
    }
}

impl<SPI, CS, MISO> Bus for SpiTransport<SPI, CS, MISO>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    MISO: InputPin,
{
    type Error = TransportError<SPI::Error>;

    fn select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(|_| TransportError::ChipSelect)
    }

    fn deselect(&mut self) -> Result<(), Self::Error> {
        self.cs.set_high().map_err(|_| TransportError::ChipSelect)
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        self.miso.is_low().map_err(|_| TransportError::ReadyLine)
    }

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.transfer_in_place(buf).map_err(TransportError::Spi)?;
        self.spi.flush().map_err(TransportError::Spi)
    }
}
