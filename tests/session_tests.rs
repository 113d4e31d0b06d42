//! Tests for the remote control session
//!
//! Covers the transmit schedule, the register programs and packet reception
//! against the simulated chip in `common`.

mod common;

use cc1101_itho::protocol::{codec, frame::RX_START};
use cc1101_itho::{
    CommandSet, DeviceIdentity, Error, Frame, LogicalCommand, Mode, RetryPolicy, Session,
    SessionConfig,
};
use common::{NoDelay, Op, SimChip};

const SIDLE: u8 = 0x36;
const SRES: u8 = 0x30;
const SRX: u8 = 0x34;
const STX: u8 = 0x35;
const SFRX: u8 = 0x3A;

fn session(chip: &mut SimChip) -> Session<&mut SimChip, NoDelay> {
    Session::new(chip, NoDelay, SessionConfig::default()).unwrap()
}

/// The 63 bytes a receiver synchronised on the frame's sync word delivers
fn received(frame: &Frame) -> Vec<u8> {
    let mut message = frame.as_bytes()[RX_START..].to_vec();
    message.resize(63, 170);
    message
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn new_resets_the_chip() {
    let mut chip = SimChip::new();
    let session = session(&mut chip);
    assert_eq!(session.mode(), Mode::Idle);
    assert_eq!(session.counter(), 0);
    assert_eq!(session.identity(), DeviceIdentity::new(22, [116, 233, 94]));
    drop(session);
    assert_eq!(chip.strobes(), vec![SRES]);
}

#[test]
fn invalid_retry_policy_fails_construction() {
    let mut chip = SimChip::new();
    let config = SessionConfig {
        retry: RetryPolicy::new(0, 0),
        ..SessionConfig::default()
    };
    assert!(matches!(
        Session::new(&mut chip, NoDelay, config),
        Err(Error::InvalidConfig)
    ));
    assert!(chip.log.is_empty());
}

// ============================================================================
// Transmit
// ============================================================================

#[test]
fn low_goes_out_three_times() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.send(LogicalCommand::Low).unwrap();
    assert_eq!(session.counter(), 1);
    assert_eq!(session.mode(), Mode::Idle);
    drop(session);

    let expected = Frame::for_command(
        LogicalCommand::Low,
        &CommandSet::default(),
        &DeviceIdentity::default(),
        1,
    )
    .unwrap();
    assert_eq!(chip.frames.len(), 3);
    for frame in &chip.frames {
        assert_eq!(frame.len(), 52);
        assert_eq!(frame.as_slice(), expected.as_bytes());
    }
}

#[test]
fn leave_goes_out_thirty_times() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.send(LogicalCommand::Leave).unwrap();
    drop(session);

    assert_eq!(chip.frames.len(), 30);
    assert!(chip.frames.iter().all(|frame| frame.len() == 60));
}

#[test]
fn join_is_streamed_and_repeated() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.send(LogicalCommand::Join).unwrap();
    drop(session);

    assert_eq!(chip.frames.len(), 3);
    assert!(chip.frames.iter().all(|frame| frame.len() == 75));
}

#[test]
fn counter_advances_once_per_send() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.send(LogicalCommand::High).unwrap();
    session.send(LogicalCommand::Timer2).unwrap();
    assert_eq!(session.counter(), 2);
    drop(session);

    let counters: Vec<u8> = chip
        .frames
        .iter()
        .map(|frame| codec::decode(&frame[RX_START..RX_START + 32]).unwrap().data[4])
        .collect();
    assert_eq!(counters, vec![1, 1, 1, 2, 2, 2]);
}

#[test]
fn counter_wraps() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    for _ in 0..256 {
        session.send(LogicalCommand::Medium).unwrap();
    }
    assert_eq!(session.counter(), 0);
}

#[test]
fn unknown_cannot_be_sent() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    assert_eq!(session.send(LogicalCommand::Unknown), Err(Error::InvalidCommand));
    assert_eq!(session.counter(), 0);
    drop(session);
    assert!(chip.frames.is_empty());
}

#[test]
fn configured_identity_is_embedded() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.configure_identity(24, [1, 2, 3]);
    session.send(LogicalCommand::Timer1).unwrap();
    drop(session);

    let decoded = codec::decode(&chip.frames[0][RX_START..RX_START + 32]).unwrap();
    assert_eq!(&decoded.data[..5], &[24, 1, 2, 3, 1]);
    assert!(codec::verify_checksum(&decoded.data));
}

#[test]
fn transmit_mode_programs_fifo_packet_length() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.enter_transmit_mode(52).unwrap();
    assert_eq!(session.mode(), Mode::TransmitReady);
    session.exit_transmit_mode().unwrap();
    assert_eq!(session.mode(), Mode::Idle);
    drop(session);

    assert_eq!(
        chip.pa_tables(),
        vec![vec![0x6F, 0x26, 0x2E, 0x8C, 0x87, 0xCD, 0xC7, 0xC0]]
    );
    // FIFO mode with fixed length, then the frame length
    let writes = chip.writes();
    let tail = &writes[writes.len() - 7..];
    assert_eq!(
        tail,
        &[(0x02, 0x2E), (0x01, 0x2E), (0x08, 0x00), (0x07, 0x00), (0x06, 52), (0x02, 0x2E), (0x01, 0x2E)]
    );
    assert_eq!(chip.register(0x06), 52);
    // Power down at the end
    assert_eq!(chip.log.last(), Some(&Op::Strobe(0x39)));
}

// ============================================================================
// Receive
// ============================================================================

#[test]
fn poll_requires_receive_mode() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    assert_eq!(session.poll(), Err(Error::WrongMode));
}

#[test]
fn receive_mode_arms_fixed_length_packets() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.enter_receive_mode().unwrap();
    assert_eq!(session.mode(), Mode::Receiving);
    drop(session);

    assert_eq!(
        chip.pa_tables(),
        vec![vec![0x6F, 0x26, 0x2E, 0x7F, 0x8A, 0x84, 0xCA, 0xC4]]
    );
    assert_eq!(chip.register(0x06), 63);
    assert_eq!(chip.register(0x08), 0x00);
    assert_eq!((chip.register(0x04), chip.register(0x05)), (179, 42));
    assert_eq!(chip.register(0x12), 0x02);
    assert_eq!(chip.strobes().last(), Some(&SRX));
}

#[test]
fn receive_mode_recovers_from_overflow_while_arming() {
    let mut chip = SimChip::new();
    // The first SRX comes from the modem setup, the second one arms
    chip.overflow_on_srx(2);
    let mut session = session(&mut chip);
    assert_eq!(session.enter_receive_mode(), Ok(()));
    assert_eq!(session.mode(), Mode::Receiving);
    drop(session);

    let strobes = chip.strobes();
    assert_eq!(&strobes[strobes.len() - 3..], &[SRX, SFRX, SRX]);
}

#[test]
fn poll_recovers_from_overflow_while_rearming() {
    let frame = Frame::for_command(
        LogicalCommand::Low,
        &CommandSet::default(),
        &DeviceIdentity::default(),
        4,
    )
    .unwrap();
    let mut chip = SimChip::new();
    chip.queue_packet(&received(&frame));
    // Modem setup, arming, the drain after the packet, then the re-arm
    chip.overflow_on_srx(4);
    let mut session = session(&mut chip);
    session.enter_receive_mode().unwrap();

    let packet = session.poll().unwrap().unwrap();
    assert_eq!(packet.command, LogicalCommand::Low);
    assert_eq!(session.poll(), Ok(None));
    drop(session);

    assert_eq!(chip.strobes().iter().filter(|&&s| s == SFRX).count(), 3);
}

#[test]
fn poll_decodes_a_complete_packet() {
    let remote = DeviceIdentity::new(22, [51, 52, 53]);
    let frame = Frame::for_command(LogicalCommand::High, &CommandSet::default(), &remote, 77).unwrap();

    let mut chip = SimChip::new();
    chip.queue_packet(&received(&frame));
    let mut session = session(&mut chip);
    session.enter_receive_mode().unwrap();

    let packet = session.poll().unwrap().unwrap();
    assert_eq!(session.mode(), Mode::Receiving);
    drop(session);

    assert_eq!(packet.identity(), remote);
    assert_eq!(packet.counter, 77);
    assert_eq!(packet.command_bytes, [34, 241, 3, 99, 4, 4]);
    assert_eq!(packet.check_bytes, packet.command_bytes);
    assert_eq!(packet.command, LogicalCommand::High);

    // Drain, then re-arm
    let strobes = chip.strobes();
    assert_eq!(&strobes[strobes.len() - 5..], &[SIDLE, SFRX, SRX, SIDLE, SRX]);
    assert_eq!(chip.register(0x06), 63);
}

#[test]
fn packets_are_polled_one_at_a_time() {
    let commands = CommandSet::default();
    let remote = DeviceIdentity::default();
    let mut chip = SimChip::new();
    for (counter, command) in [(10, LogicalCommand::Low), (11, LogicalCommand::Timer3)] {
        let frame = Frame::for_command(command, &commands, &remote, counter).unwrap();
        chip.queue_packet(&received(&frame));
    }

    let mut session = session(&mut chip);
    session.enter_receive_mode().unwrap();
    let first = session.poll().unwrap().unwrap();
    let second = session.poll().unwrap().unwrap();
    assert_eq!((first.counter, first.command), (10, LogicalCommand::Low));
    assert_eq!((second.counter, second.command), (11, LogicalCommand::Timer3));
    assert_eq!(session.poll(), Ok(None));
}

#[test]
fn partial_fifo_is_not_a_packet() {
    let mut chip = SimChip::new();
    chip.queue_packet(&[171, 42, 0x66, 0x66, 0x66]);
    let mut session = session(&mut chip);
    session.enter_receive_mode().unwrap();
    assert_eq!(session.poll(), Ok(None));
    drop(session);

    // Only the drain follows the arming, no re-arm
    let strobes = chip.strobes();
    assert_eq!(&strobes[strobes.len() - 5..], &[SIDLE, SRX, SIDLE, SFRX, SRX]);
}

#[test]
fn corrupted_packet_is_unknown() {
    let frame = Frame::for_command(
        LogicalCommand::Medium,
        &CommandSet::default(),
        &DeviceIdentity::default(),
        3,
    )
    .unwrap();
    let mut message = received(&frame);
    // Flip the first complement bit of the command bytes
    message[2 + 101 / 8] ^= 0x80 >> (101 % 8);

    let mut chip = SimChip::new();
    chip.queue_packet(&message);
    let mut session = session(&mut chip);
    session.enter_receive_mode().unwrap();

    let packet = session.poll().unwrap().unwrap();
    assert_eq!(packet.command, LogicalCommand::Unknown);
    assert_eq!(packet.counter, 3);
}

#[test]
fn failed_send_still_returns_to_receive() {
    let mut chip = SimChip::new();
    // TX FIFO never drains below the refill threshold
    chip.script(0x3A, &[61; 200]);
    let config = SessionConfig {
        retry: RetryPolicy::new(50, 0),
        ..SessionConfig::default()
    };
    let mut session = Session::new(&mut chip, NoDelay, config).unwrap();
    session.enter_receive_mode().unwrap();

    assert_eq!(session.send(LogicalCommand::Join), Err(Error::Unresponsive));
    assert_eq!(session.counter(), 1);
    assert_eq!(session.mode(), Mode::Receiving);
    drop(session);

    assert_eq!(chip.strobes().last(), Some(&SRX));
}

#[test]
fn send_while_receiving_returns_to_receive() {
    let mut chip = SimChip::new();
    let mut session = session(&mut chip);
    session.enter_receive_mode().unwrap();
    session.send(LogicalCommand::Low).unwrap();
    assert_eq!(session.mode(), Mode::Receiving);
    drop(session);

    assert_eq!(chip.frames.len(), 3);
    let strobes = chip.strobes();
    assert_eq!(strobes.last(), Some(&SRX));
    assert!(strobes.contains(&STX));
}
