//! Simulated CC1101 for integration tests
//!
//! Interprets header bytes the way the chip does and keeps a small behavioral
//! model of the radio state: strobes switch state, the TX FIFO drains by one
//! byte per chip select bracket while a packet is on air, the RX FIFO is
//! filled by the test and can be made to overflow. Status register values can be scripted to override
//! the model.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;

use cc1101_itho::transport::Bus;
use embedded_hal::delay::DelayNs;

/// Delay provider that returns immediately
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Observable chip operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Strobe(u8),
    Write(u8, u8),
    PaTable(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Rx,
    Tx,
    RxOverflow,
    TxUnderflow,
}

impl State {
    fn marcstate(self) -> u8 {
        match self {
            State::Idle => 0x01,
            State::Rx => 0x0D,
            State::Tx => 0x13,
            State::RxOverflow => 0x11,
            State::TxUnderflow => 0x16,
        }
    }

    fn status_bits(self) -> u8 {
        match self {
            State::Idle => 0,
            State::Rx => 1,
            State::Tx => 2,
            State::RxOverflow => 6,
            State::TxUnderflow => 7,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Access {
    read: bool,
    burst: bool,
    addr: u8,
}

pub struct SimChip {
    state: State,
    regs: [u8; 0x2F],
    access: Option<Access>,
    selected: bool,

    tx_fifo: VecDeque<u8>,
    tx_current: Vec<u8>,
    on_air: bool,
    rx_fifo: VecDeque<u8>,
    incoming: VecDeque<Vec<u8>>,
    srx_strobes: usize,
    overflow_on: Vec<usize>,

    scripted: HashMap<u8, VecDeque<u8>>,
    not_ready_polls: usize,
    never_ready: bool,
    ready_countdown: usize,

    /// Strobes and writes in the order they arrived
    pub log: Vec<Op>,
    /// Frames that went on air completely or ended in an underflow
    pub frames: Vec<Vec<u8>>,
    /// Status register addresses in the order they were read
    pub status_reads: Vec<u8>,
    /// Chip select brackets opened
    pub selects: usize,
}

impl Default for SimChip {
    fn default() -> Self {
        Self::new()
    }
}

impl SimChip {
    pub fn new() -> Self {
        let mut chip = Self {
            state: State::Idle,
            regs: [0; 0x2F],
            access: None,
            selected: false,
            tx_fifo: VecDeque::new(),
            tx_current: Vec::new(),
            on_air: false,
            rx_fifo: VecDeque::new(),
            incoming: VecDeque::new(),
            srx_strobes: 0,
            overflow_on: Vec::new(),
            scripted: HashMap::new(),
            not_ready_polls: 0,
            never_ready: false,
            ready_countdown: 0,
            log: Vec::new(),
            frames: Vec::new(),
            status_reads: Vec::new(),
            selects: 0,
        };
        chip.power_on_defaults();
        chip
    }

    /// Values returned by the next reads of a status register, ahead of the model
    pub fn script(&mut self, addr: u8, values: &[u8]) {
        self.scripted.entry(addr).or_default().extend(values);
    }

    /// SO stays high for `polls` ready checks after every select
    pub fn busy_for(&mut self, polls: usize) {
        self.not_ready_polls = polls;
    }

    /// SO never goes low
    pub fn never_ready(&mut self) {
        self.never_ready = true;
    }

    /// A packet arrives in the RX FIFO
    pub fn deliver(&mut self, bytes: &[u8]) {
        self.rx_fifo.extend(bytes);
    }

    /// A packet that lands in the RX FIFO once the chip listens and the
    /// host next checks RXBYTES
    pub fn queue_packet(&mut self, bytes: &[u8]) {
        self.incoming.push_back(bytes.to_vec());
    }

    /// The RX FIFO overflows right after the `nth` SRX strobe, counted
    /// from 1 since the chip was created
    pub fn overflow_on_srx(&mut self, nth: usize) {
        self.overflow_on.push(nth);
    }

    /// The RX FIFO overflows
    pub fn overflow(&mut self) {
        if self.state == State::Rx {
            self.state = State::RxOverflow;
        }
    }

    pub fn rx_pending(&self) -> usize {
        self.rx_fifo.len()
    }

    pub fn register(&self, addr: u8) -> u8 {
        self.regs[usize::from(addr)]
    }

    pub fn strobes(&self) -> Vec<u8> {
        self.log
            .iter()
            .filter_map(|op| match op {
                Op::Strobe(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.log
            .iter()
            .filter_map(|op| match op {
                Op::Write(addr, value) => Some((*addr, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn pa_tables(&self) -> Vec<Vec<u8>> {
        self.log
            .iter()
            .filter_map(|op| match op {
                Op::PaTable(table) => Some(table.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.status_reads.clear();
    }

    fn power_on_defaults(&mut self) {
        self.regs = [0; 0x2F];
        self.regs[0x04] = 0xD3;
        self.regs[0x05] = 0x91;
        self.regs[0x06] = 0xFF;
        self.regs[0x08] = 0x45;
    }

    fn status_byte(&self, read: bool) -> u8 {
        let fifo = if read {
            self.rx_fifo.len()
        } else {
            64 - self.tx_fifo.len()
        };
        (self.state.status_bits() << 4) | fifo.min(15) as u8
    }

    fn strobe(&mut self, addr: u8) {
        self.log.push(Op::Strobe(addr));
        match addr {
            0x30 => {
                self.power_on_defaults();
                self.state = State::Idle;
                self.tx_fifo.clear();
                self.rx_fifo.clear();
                self.on_air = false;
            }
            0x34 => {
                self.srx_strobes += 1;
                self.state = if self.overflow_on.contains(&self.srx_strobes) {
                    State::RxOverflow
                } else {
                    State::Rx
                };
            }
            0x35 => {
                self.state = State::Tx;
                self.on_air = !self.tx_fifo.is_empty();
                self.tx_current.clear();
            }
            0x33 | 0x36 | 0x39 => {
                self.state = State::Idle;
                self.on_air = false;
            }
            0x3A => {
                self.rx_fifo.clear();
                if self.state == State::RxOverflow {
                    self.state = State::Idle;
                }
            }
            0x3B => {
                self.tx_fifo.clear();
                if self.state == State::TxUnderflow {
                    self.state = State::Idle;
                }
            }
            _ => {}
        }
    }

    /// One byte leaves the TX FIFO
    fn air_tick(&mut self) {
        if !self.on_air {
            return;
        }
        match self.tx_fifo.pop_front() {
            Some(byte) => self.tx_current.push(byte),
            None => {
                self.state = State::TxUnderflow;
                self.finish_frame();
                return;
            }
        }
        if self.tx_current.len() >= usize::from(self.regs[0x06]) {
            self.state = State::Idle;
            self.finish_frame();
        }
    }

    fn finish_frame(&mut self) {
        self.on_air = false;
        self.frames.push(std::mem::take(&mut self.tx_current));
    }

    fn read_status(&mut self, addr: u8) -> u8 {
        self.status_reads.push(addr);
        if let Some(value) = self.scripted.get_mut(&addr).and_then(VecDeque::pop_front) {
            return value;
        }
        match addr {
            0x30 => 0x00,
            0x31 => 0x14,
            0x35 => self.state.marcstate(),
            0x3A => {
                let underflow = if self.state == State::TxUnderflow { 0x80 } else { 0 };
                underflow | self.tx_fifo.len() as u8
            }
            0x3B => {
                if self.state == State::Rx && self.rx_fifo.is_empty() {
                    if let Some(packet) = self.incoming.pop_front() {
                        self.rx_fifo.extend(packet);
                    }
                }
                let overflow = if self.state == State::RxOverflow { 0x80 } else { 0 };
                overflow | self.rx_fifo.len().min(0x7F) as u8
            }
            _ => 0,
        }
    }

    fn header(&mut self, byte: u8) -> u8 {
        let read = byte & 0x80 != 0;
        let burst = byte & 0x40 != 0;
        let addr = byte & 0x3F;
        let status = self.status_byte(read);

        if (0x30..=0x3D).contains(&addr) && !burst {
            self.strobe(addr);
            return status;
        }
        if addr == 0x3E && !read {
            self.log.push(Op::PaTable(Vec::new()));
        }
        self.access = Some(Access { read, burst, addr });
        status
    }

    fn data(&mut self, access: Access, byte: u8) -> u8 {
        let Access { read, burst, addr } = access;
        let status_space = (0x30..=0x3D).contains(&addr);

        let value = match (read, addr) {
            (false, 0x3F) => {
                self.tx_fifo.push_back(byte);
                0
            }
            (false, 0x3E) => {
                if let Some(Op::PaTable(table)) = self.log.last_mut() {
                    table.push(byte);
                }
                0
            }
            (false, addr) if addr < 0x2F => {
                self.regs[usize::from(addr)] = byte;
                self.log.push(Op::Write(addr, byte));
                0
            }
            (true, 0x3F) => self.rx_fifo.pop_front().unwrap_or(0),
            (true, addr) if status_space => self.read_status(addr),
            (true, addr) if addr < 0x2F => self.regs[usize::from(addr)],
            _ => 0,
        };

        self.access = if burst && !status_space {
            let next = if addr < 0x2E { addr + 1 } else { addr };
            let addr = if addr == 0x3E || addr == 0x3F { addr } else { next };
            Some(Access { read, burst, addr })
        } else {
            None
        };
        value
    }
}

impl Bus for SimChip {
    type Error = Infallible;

    fn select(&mut self) -> Result<(), Infallible> {
        self.selected = true;
        self.selects += 1;
        self.access = None;
        self.ready_countdown = self.not_ready_polls;
        self.air_tick();
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), Infallible> {
        self.selected = false;
        self.access = None;
        Ok(())
    }

    fn is_ready(&mut self) -> Result<bool, Infallible> {
        if self.never_ready {
            return Ok(false);
        }
        if self.ready_countdown > 0 {
            self.ready_countdown -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Infallible> {
        assert!(self.selected, "exchange outside a chip select bracket");
        for byte in buf.iter_mut() {
            *byte = match self.access {
                None => self.header(*byte),
                Some(access) => self.data(access, *byte),
            };
        }
        Ok(())
    }
}
