//! CC1101 Device Interface
//!
//! This module provides the register and command level interface to the CC1101.
//! It is built around the `Device<BUS, DELAY>` struct which wraps a [`Bus`] and a
//! delay provider and offers:
//! - Command strobes
//! - Single and burst register access in both address spaces
//! - Typed register access through `regiface`
//! - FIFO streaming in both directions
//!
//! Every transaction is bracketed by chip select and waits for the chip to
//! signal ready before clocking. The chip status byte clocked in with each
//! header is kept and available through [`Device::status`].
//!
//! # Polling
//! The chip gives no completion interrupts on this path, so several
//! operations poll a register until it reaches a value. All polling runs under
//! the [`RetryPolicy`] given at construction and fails with
//! [`Error::Unresponsive`] once it is exhausted.
//!
//! # Example
//! ```no_run
//! use cc1101_itho::{Device, StatusRegister, transport::Bus};
//! use embedded_hal::delay::DelayNs;
//!
//! fn version<BUS: Bus, D: DelayNs>(bus: BUS, delay: D) -> Result<u8, cc1101_itho::Error<BUS::Error>> {
//!     let mut device = Device::new(bus, delay);
//!     device.reset()?;
//!     device.read_register(StatusRegister::Version)
//! }
//! ```

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use regiface::{ByteArray, FromByteArray, ReadableRegister, WritableRegister};

use crate::commands::{ChipStatus, Strobe};
use crate::registers::{
    Access, Address, ChipVersion, MarcState, PartNumber, RadioState, Register, RxBytes, StatusRegister,
    TxBytes,
};
use crate::transport::Bus;
use crate::Error;

/// Capacity of the TX and RX FIFOs
pub const FIFO_SIZE: usize = 64;

/// Bytes written to the TX FIFO per refill. Three bytes of headroom stay free.
pub const TX_CHUNK: usize = FIFO_SIZE - 3;

/// Bound on every polling loop of the driver
///
/// A chip that never answers would otherwise hang the caller forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Polls before giving up, at least 1
    pub max_attempts: u32,
    /// Pause between two polls in microseconds
    pub delay_us: u32,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay_us: u32) -> Self {
        Self {
            max_attempts,
            delay_us,
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.max_attempts > 0
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10_000, 10)
    }
}

/// Main device interface for the CC1101 radio.
pub struct Device<BUS, DELAY> {
    bus: BUS,
    delay: DELAY,
    retry: RetryPolicy,
    status: Option<ChipStatus>,
}

impl<BUS, DELAY> Device<BUS, DELAY> {
    /// Creates a new Device with the default [`RetryPolicy`].
    ///
    /// # Arguments
    /// * `bus` - Transport to the chip
    /// * `delay` - Delay provider for reset timing and polling pauses
    pub fn new(bus: BUS, delay: DELAY) -> Self {
        Self {
            bus,
            delay,
            retry: RetryPolicy::default(),
            status: None,
        }
    }

    /// Status byte clocked in by the most recent transfer
    pub fn status(&self) -> Option<ChipStatus> {
        self.status
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Releases the bus and the delay provider.
    pub fn release(self) -> (BUS, DELAY) {
        (self.bus, self.delay)
    }
}

impl<BUS, DELAY> Device<BUS, DELAY>
where
    BUS: Bus,
    DELAY: DelayNs,
{
    /// Creates a new Device polling under the given policy.
    ///
    /// # Errors
    /// * `Error::InvalidConfig` - The policy allows no attempt at all
    pub fn with_retry_policy(bus: BUS, delay: DELAY, retry: RetryPolicy) -> Result<Self, Error<BUS::Error>> {
        if !retry.is_valid() {
            return Err(Error::InvalidConfig);
        }
        Ok(Self {
            bus,
            delay,
            retry,
            status: None,
        })
    }

    /// Power-on reset
    ///
    /// Manual reset sequence from the datasheet: strobe chip
    /// select to make sure the chip starts in a known SPI state, then issue
    /// SRES and give the chip time to come back.
    ///
    /// # Errors
    /// * `Error::Bus` - Transport failed
    /// * `Error::Unresponsive` - SO never went low after SRES was due
    pub fn reset(&mut self) -> Result<(), Error<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("reset()");
        self.bus.deselect()?;
        self.delay.delay_us(5);
        self.bus.select()?;
        self.delay.delay_us(10);
        self.bus.deselect()?;
        self.delay.delay_us(45);
        self.bus.select()?;

        let result = self.await_ready().and_then(|_| {
            let mut buf = [Strobe::Sres.header()];
            self.exchange(&mut buf)
        });
        self.delay.delay_ms(10);
        let released = self.bus.deselect();
        result?;
        released?;
        Ok(())
    }

    /// Issues a command strobe and returns the status byte clocked in with it.
    pub fn strobe(&mut self, strobe: Strobe) -> Result<ChipStatus, Error<BUS::Error>> {
        self.transaction(|dev| {
            let mut buf = [strobe.header()];
            dev.exchange(&mut buf)?;
            Ok(ChipStatus::new(buf[0]))
        })
    }

    /// Writes a single configuration register, the PA table head or one FIFO byte.
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<BUS::Error>> {
        self.write_raw(Access::WRITE_SINGLE.header(register.addr()), &[value])
    }

    /// Writes consecutive registers starting at `register`.
    ///
    /// The whole buffer goes out inside one chip select bracket. For
    /// [`Register::Fifo`] all bytes land in the TX FIFO, for
    /// [`Register::PaTable`] they fill the power table.
    pub fn write_burst(&mut self, register: Register, data: &[u8]) -> Result<(), Error<BUS::Error>> {
        self.write_raw(Access::WRITE_BURST.header(register.addr()), data)
    }

    /// Reads a configuration or status register.
    ///
    /// Status registers hit by the SPI read synchronization erratum are read
    /// again and again inside the same bracket until two consecutive reads agree.
    ///
    /// # Errors
    /// * `Error::Bus` - Transport failed
    /// * `Error::Unresponsive` - The value never settled within the retry policy
    pub fn read_register(&mut self, address: impl Into<Address>) -> Result<u8, Error<BUS::Error>> {
        let address = address.into();
        let header = address.read_header();
        self.transaction(|dev| {
            let mut value = dev.read_once(header)?;
            if !address.needs_double_read() {
                return Ok(value);
            }
            for _ in 0..dev.retry.max_attempts {
                let again = dev.read_once(header)?;
                if again == value {
                    return Ok(value);
                }
                value = again;
            }
            #[cfg(feature = "defmt")]
            defmt::warn!("{} never settled", address);
            Err(Error::Unresponsive)
        })
    }

    /// Reads a register three times and returns the median.
    ///
    /// Used to filter FIFO occupancy while the FIFO is being drained.
    pub fn read_register_median_of_3(&mut self, address: impl Into<Address>) -> Result<u8, Error<BUS::Error>> {
        let header = address.into().read_header();
        let mut values = [0u8; 3];
        for value in values.iter_mut() {
            *value = self.transaction(|dev| dev.read_once(header))?;
        }
        values.sort_unstable();
        Ok(values[1])
    }

    /// Reads consecutive configuration registers, or the RX FIFO, into `buf`.
    pub fn read_burst(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Error<BUS::Error>> {
        self.read_raw(Access::READ_BURST.header(register.addr()), buf)
    }

    /// Reads a typed register.
    ///
    /// Status registers are read through [`Device::read_register`], so the
    /// erratum double-read applies to them.
    ///
    /// # Errors
    /// * `Error::Bus` - Transport failed
    /// * `Error::Deserialization` - The register could not be parsed
    pub fn read<R>(&mut self) -> Result<R, Error<BUS::Error>>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();
        let bytes = raw_value.as_mut();
        match StatusRegister::from_addr(R::id()) {
            Some(status) if bytes.len() == 1 => bytes[0] = self.read_register(status)?,
            _ if bytes.len() == 1 => {
                bytes[0] = self.transaction(|dev| dev.read_once(Access::READ_SINGLE.header(R::id())))?
            }
            _ => self.read_raw(Access::READ_BURST.header(R::id()), bytes)?,
        }

        R::from_bytes(raw_value).map_err(|_| Error::Deserialization)
    }

    /// Writes a typed register, as a burst when it spans several addresses.
    pub fn write<R>(&mut self, register: R) -> Result<(), Error<BUS::Error>>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = register.to_bytes().unwrap_or_else(|e| match e {});
        let raw_value: &[u8] = raw_value.as_ref();
        let access = if raw_value.len() == 1 {
            Access::WRITE_SINGLE
        } else {
            Access::WRITE_BURST
        };
        self.write_raw(access.header(R::id()), raw_value)
    }

    /// Current main radio control state
    pub fn marc_state(&mut self) -> Result<MarcState, Error<BUS::Error>> {
        Ok(self.read::<RadioState>()?.state)
    }

    /// Chip part number, 0x00 for a CC1101
    pub fn part_number(&mut self) -> Result<u8, Error<BUS::Error>> {
        Ok(self.read::<PartNumber>()?.value)
    }

    /// Chip silicon revision
    pub fn version(&mut self) -> Result<u8, Error<BUS::Error>> {
        Ok(self.read::<ChipVersion>()?.value)
    }

    /// Runs `check` until it yields a value, pausing between attempts as the
    /// retry policy says.
    ///
    /// # Errors
    /// * `Error::Unresponsive` - `check` kept returning `None`
    /// * Whatever `check` fails with
    pub fn poll_until<T, F>(&mut self, mut check: F) -> Result<T, Error<BUS::Error>>
    where
        F: FnMut(&mut Self) -> Result<Option<T>, Error<BUS::Error>>,
    {
        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                self.delay.delay_us(self.retry.delay_us);
            }
            if let Some(value) = check(self)? {
                return Ok(value);
            }
        }
        #[cfg(feature = "defmt")]
        defmt::warn!("polling gave up after {} attempts", self.retry.max_attempts);
        Err(Error::Unresponsive)
    }

    /// Polls MARCSTATE until it reports `state`.
    pub fn wait_for_state(&mut self, state: MarcState) -> Result<(), Error<BUS::Error>> {
        self.poll_until(|dev| Ok((dev.marc_state()? == state).then_some(())))
    }

    /// Polls MARCSTATE until RX.
    ///
    /// The first RX FIFO overflow seen is flushed and RX entered again; SFRX
    /// leaves the radio in IDLE. A second overflow is not recovered.
    ///
    /// # Errors
    /// * `Error::Unresponsive` - RX was not reached within the retry policy
    pub fn wait_for_rx(&mut self) -> Result<(), Error<BUS::Error>> {
        let mut flushed = false;
        self.poll_until(|dev| {
            let state = dev.marc_state()?;
            if state == MarcState::RxFifoOverflow && !flushed {
                #[cfg(feature = "defmt")]
                defmt::debug!("RX FIFO overflow while arming, flushing");
                dev.strobe(Strobe::Sfrx)?;
                dev.strobe(Strobe::Srx)?;
                flushed = true;
            }
            Ok((state == MarcState::Rx).then_some(()))
        })
    }

    pub fn pause_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    pub fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Drains the RX FIFO.
    ///
    /// Returns whatever RXBYTES reports as available. After an RX FIFO overflow
    /// the contents are stale and an empty buffer comes back instead; the same
    /// happens when more than `max_len` bytes wait. In every case the radio is
    /// re-armed afterwards: IDLE, flush RX, RX.
    pub fn receive_fifo(&mut self, max_len: usize) -> Result<Vec<u8, FIFO_SIZE>, Error<BUS::Error>> {
        let available = usize::from(self.read::<RxBytes>()?.count);
        let overflow = self.marc_state()? == MarcState::RxFifoOverflow;

        let mut data = Vec::new();
        if overflow {
            #[cfg(feature = "defmt")]
            defmt::warn!("RX FIFO overflow, dropping {} bytes", available);
        } else if available > max_len || available > FIFO_SIZE {
            #[cfg(feature = "defmt")]
            defmt::warn!("RX FIFO holds {} bytes, expected at most {}", available, max_len);
        } else {
            // available <= FIFO_SIZE
            let _ = data.resize_default(available);
            self.read_burst(Register::Fifo, &mut data)?;
        }

        self.strobe(Strobe::Sidle)?;
        self.strobe(Strobe::Sfrx)?;
        self.strobe(Strobe::Srx)?;

        Ok(data)
    }

    /// Transmits `data` through the TX FIFO.
    ///
    /// Data longer than one FIFO load is streamed: once transmission started
    /// the FIFO is topped up whenever enough room frees up. Returns when the
    /// chip has left TX, either back to IDLE or into TXFIFO_UNDERFLOW.
    ///
    /// The packet length register must already match `data.len()`.
    pub fn transmit_fifo(&mut self, data: &[u8]) -> Result<(), Error<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("transmit_fifo({} bytes)", data.len());
        self.strobe(Strobe::Sidle)?;

        if self.read::<TxBytes>()?.underflow {
            self.strobe(Strobe::Sidle)?;
            self.strobe(Strobe::Sftx)?;
        }

        self.strobe(Strobe::Sidle)?;

        let mut sent = data.len().min(TX_CHUNK);
        self.write_burst(Register::Fifo, &data[..sent])?;

        self.strobe(Strobe::Sidle)?;
        self.strobe(Strobe::Stx)?;

        while sent < data.len() {
            let queued = self.poll_until(|dev| {
                let raw = dev.read_register_median_of_3(StatusRegister::TxBytes)?;
                let queued = usize::from(TxBytes::from_bytes([raw]).unwrap_or_else(|e| match e {}).count);
                Ok((queued <= TX_CHUNK - 2).then_some(queued))
            })?;

            let length = (TX_CHUNK - queued).min(data.len() - sent);
            for &byte in &data[sent..sent + length] {
                self.write_register(Register::Fifo, byte)?;
            }
            sent += length;
        }

        self.poll_until(|dev| {
            let state = dev.marc_state()?;
            Ok(matches!(state, MarcState::Idle | MarcState::TxFifoUnderflow).then_some(()))
        })
    }

    fn await_ready(&mut self) -> Result<(), Error<BUS::Error>> {
        for attempt in 0..self.retry.max_attempts {
            if attempt > 0 {
                self.delay.delay_us(self.retry.delay_us);
            }
            if self.bus.is_ready()? {
                return Ok(());
            }
        }
        #[cfg(feature = "defmt")]
        defmt::warn!("chip not ready");
        Err(Error::Unresponsive)
    }

    /// Runs `op` between select and deselect. Chip select is released even
    /// when `op` fails.
    fn transaction<T, F>(&mut self, op: F) -> Result<T, Error<BUS::Error>>
    where
        F: FnOnce(&mut Self) -> Result<T, Error<BUS::Error>>,
    {
        self.bus.select()?;
        let result = self.await_ready().and_then(|_| op(self));
        let released = self.bus.deselect();
        let value = result?;
        released?;
        Ok(value)
    }

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Error<BUS::Error>> {
        self.bus.exchange(buf)?;
        if let Some(&status) = buf.first() {
            self.status = Some(ChipStatus::new(status));
        }
        Ok(())
    }

    fn read_once(&mut self, header: u8) -> Result<u8, Error<BUS::Error>> {
        let mut buf = [header, 0x00];
        self.exchange(&mut buf)?;
        Ok(buf[1])
    }

    fn write_raw(&mut self, header: u8, data: &[u8]) -> Result<(), Error<BUS::Error>> {
        self.transaction(|dev| {
            let mut head = [header];
            dev.exchange(&mut head)?;
            let mut scratch = [0u8; 16];
            for chunk in data.chunks(scratch.len()) {
                let out = &mut scratch[..chunk.len()];
                out.copy_from_slice(chunk);
                dev.bus.exchange(out)?;
            }
            Ok(())
        })
    }

    fn read_raw(&mut self, header: u8, buf: &mut [u8]) -> Result<(), Error<BUS::Error>> {
        self.transaction(|dev| {
            let mut head = [header];
            dev.exchange(&mut head)?;
            buf.fill(0);
            dev.bus.exchange(buf)?;
            Ok(())
        })
    }
}
