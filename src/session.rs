//! Itho remote session
//!
//! [`Session`] owns a [`Device`] and plays the part of a ventilation remote:
//! it sends logical commands under a configured identity and listens for the
//! commands of other remotes.
//!
//! # Modes
//! ```text
//! Idle --enter_transmit_mode--> TransmitReady --exit_transmit_mode--> Idle
//! Idle --enter_receive_mode---> Receiving     --poll--> Receiving
//! ```
//!
//! [`Session::send`] runs the whole transmit cycle itself, once per copy of
//! the frame, and returns to receiving if the session was receiving before.
//!
//! # Example
//! ```no_run
//! use cc1101_itho::{LogicalCommand, Session, SessionConfig, transport::Bus};
//! use embedded_hal::delay::DelayNs;
//!
//! fn boost<BUS: Bus, D: DelayNs>(bus: BUS, delay: D) -> Result<(), cc1101_itho::Error<BUS::Error>> {
//!     let mut session = Session::new(bus, delay, SessionConfig::default())?;
//!     session.send(LogicalCommand::Timer1)?;
//!
//!     session.enter_receive_mode()?;
//!     loop {
//!         if let Some(packet) = session.poll()? {
//!             if packet.is_known() {
//!                 break Ok(());
//!             }
//!         }
//!     }
//! }
//! ```

use embedded_hal::delay::DelayNs;

use crate::device::{Device, RetryPolicy};
use crate::profiles::{self, Step};
use crate::protocol::{
    CommandSet, DecodedPacket, DeviceIdentity, Frame, LogicalCommand, Repeat, RX_PACKET_LEN,
};
use crate::registers::PacketLength;
use crate::transport::Bus;
use crate::Error;

/// Radio mode as far as the session knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Powered down or idle, no profile loaded
    Idle,
    /// Transmit profile loaded for a frame of known length
    TransmitReady,
    /// Armed for fixed length packets
    Receiving,
}

/// Everything a [`Session`] needs besides the hardware
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionConfig {
    /// Identity put into outgoing frames
    pub identity: DeviceIdentity,
    /// Command signatures of the emulated remote
    pub commands: CommandSet,
    /// Bound on all chip polling
    pub retry: RetryPolicy,
}

/// Remote control session on top of a CC1101
pub struct Session<BUS, DELAY> {
    device: Device<BUS, DELAY>,
    identity: DeviceIdentity,
    commands: CommandSet,
    counter: u8,
    mode: Mode,
}

impl<BUS, DELAY> Session<BUS, DELAY> {
    /// Counter value of the last frame sent
    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Direct access to the driver. Changing radio registers behind the
    /// session's back leaves [`Session::mode`] stale.
    pub fn device(&mut self) -> &mut Device<BUS, DELAY> {
        &mut self.device
    }

    /// Sets the identity embedded in outgoing frames.
    pub fn configure_identity(&mut self, device_type: u8, device_id: [u8; 3]) {
        self.identity = DeviceIdentity::new(device_type, device_id);
    }

    /// Releases the driver.
    pub fn release(self) -> Device<BUS, DELAY> {
        self.device
    }
}

impl<BUS, DELAY> Session<BUS, DELAY>
where
    BUS: Bus,
    DELAY: DelayNs,
{
    /// Creates a session and resets the chip.
    ///
    /// # Errors
    /// * `Error::InvalidConfig` - The retry policy allows no attempt
    /// * `Error::Bus` / `Error::Unresponsive` - The reset failed
    pub fn new(bus: BUS, delay: DELAY, config: SessionConfig) -> Result<Self, Error<BUS::Error>> {
        let mut device = Device::with_retry_policy(bus, delay, config.retry)?;
        device.reset()?;

        Ok(Self {
            device,
            identity: config.identity,
            commands: config.commands,
            counter: 0,
            mode: Mode::Idle,
        })
    }

    /// Loads the transmit profile for a frame of `length` bytes.
    pub fn enter_transmit_mode(&mut self, length: u8) -> Result<(), Error<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("enter_transmit_mode({})", length);
        self.run(profiles::TX_POWER_CYCLE)?;
        self.run(profiles::TX_SERIAL)?;
        self.run(profiles::TX_FIFO)?;
        self.device.write(PacketLength { length })?;
        self.mode = Mode::TransmitReady;
        Ok(())
    }

    /// Idles the radio and powers it down.
    pub fn exit_transmit_mode(&mut self) -> Result<(), Error<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("exit_transmit_mode()");
        self.run(profiles::TX_SHUTDOWN)?;
        self.mode = Mode::Idle;
        Ok(())
    }

    /// Sends `command` under the configured identity.
    ///
    /// The counter advances once, then the same frame goes on air as often
    /// as [`LogicalCommand::repeat`] says. A session that was receiving is
    /// receiving again afterwards.
    ///
    /// # Errors
    /// * `Error::InvalidCommand` - `command` is [`LogicalCommand::Unknown`]
    /// * `Error::Bus` / `Error::Unresponsive` - The chip failed mid transmission.
    ///   The counter stays advanced and the remaining copies are not sent. A
    ///   session that was receiving still tries to return to receive mode;
    ///   the transmit error is reported first.
    pub fn send(&mut self, command: LogicalCommand) -> Result<(), Error<BUS::Error>> {
        let counter = self.counter.wrapping_add(1);
        let frame = Frame::for_command(command, &self.commands, &self.identity, counter)
            .ok_or(Error::InvalidCommand)?;
        let length = u8::try_from(frame.len()).map_err(|_| Error::InvalidCommand)?;
        self.counter = counter;

        let resume_rx = self.mode == Mode::Receiving;
        let repeat = command.repeat();
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "sending {} #{} ({} bytes, {} times)",
            command,
            counter,
            length,
            repeat.count
        );

        let sent = self.transmit(&frame, length, repeat);
        let resumed = if resume_rx {
            self.enter_receive_mode()
        } else {
            Ok(())
        };
        sent?;
        resumed
    }

    fn transmit(&mut self, frame: &Frame, length: u8, repeat: Repeat) -> Result<(), Error<BUS::Error>> {
        for _ in 0..repeat.count {
            self.enter_transmit_mode(length)?;
            self.device.transmit_fifo(frame.as_bytes())?;
            self.exit_transmit_mode()?;
            self.device.pause_ms(repeat.gap_ms);
        }
        Ok(())
    }

    /// Resets the chip into the receive profile and arms it for packets.
    ///
    /// Blocks until calibration is done and the radio reports RX.
    pub fn enter_receive_mode(&mut self) -> Result<(), Error<BUS::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("enter_receive_mode()");
        self.run(profiles::RX_CALIBRATE)?;
        self.run(profiles::RX_MODEM)?;
        self.run(profiles::RX_ARM)?;
        self.mode = Mode::Receiving;
        Ok(())
    }

    /// Returns the next packet received, if any.
    ///
    /// Only a complete packet counts; partial FIFO contents are dropped.
    /// After a packet the receiver is armed again.
    ///
    /// # Errors
    /// * `Error::WrongMode` - The session is not receiving
    pub fn poll(&mut self) -> Result<Option<DecodedPacket>, Error<BUS::Error>> {
        if self.mode != Mode::Receiving {
            return Err(Error::WrongMode);
        }

        let message = self.device.receive_fifo(RX_PACKET_LEN)?;
        if message.len() != RX_PACKET_LEN {
            return Ok(None);
        }

        let packet = DecodedPacket::parse(&message, &self.commands);
        self.run(profiles::RX_ARM)?;

        #[cfg(feature = "defmt")]
        if let Some(packet) = &packet {
            defmt::debug!(
                "received {} from {}/{} #{}",
                packet.command,
                packet.device_type,
                packet.device_id,
                packet.counter
            );
        }
        Ok(packet)
    }

    fn run(&mut self, steps: &[Step]) -> Result<(), Error<BUS::Error>> {
        for step in steps {
            match *step {
                Step::Strobe(strobe) => {
                    self.device.strobe(strobe)?;
                }
                Step::Write(register, value) => self.device.write_register(register, value)?,
                Step::PaTable(table) => self.device.write(table)?,
                Step::Frequency(frequency) => self.device.write(frequency)?,
                Step::SyncWord(sync) => self.device.write(sync)?,
                Step::PacketLength(length) => self.device.write(length)?,
                Step::PacketControl(control) => self.device.write(control)?,
                Step::Modem(modem) => self.device.write(modem)?,
                Step::Pause(us) => self.device.pause_us(us),
                Step::WaitFor(state) => self.device.wait_for_state(state)?,
                Step::AwaitRx => self.device.wait_for_rx()?,
            }
        }
        Ok(())
    }
}
