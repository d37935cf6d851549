//! Test doubles shared by the unit tests

use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use ili9481_core::color::Color;
use ili9481_hal::{DataPort, DmaChannel, OutputPin, PortDirection};

use crate::bus::Bus;
use crate::transport::{PixelEncoding, Transport};

/// Control line identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    Cs,
    Dc,
    Wr,
    Rd,
    Rst,
}

/// Electrical event on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    High(Pin),
    Low(Pin),
    Data(u8),
    Direction(PortDirection),
}

/// Shared record of line transitions
#[derive(Clone, Default)]
pub struct LineLog {
    events: Rc<RefCell<Vec<Line>>>,
    input: Rc<Cell<u8>>,
}

impl LineLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: Line) {
        self.events.borrow_mut().push(line);
    }

    pub fn take(&self) -> Vec<Line> {
        core::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Byte the panel drives while the port is an input
    pub fn set_input(&self, byte: u8) {
        self.input.set(byte);
    }
}

pub struct LogPin {
    log: LineLog,
    pin: Pin,
    high: bool,
}

impl LogPin {
    pub fn new(log: &LineLog, pin: Pin) -> Self {
        Self {
            log: log.clone(),
            pin,
            high: false,
        }
    }
}

impl OutputPin for LogPin {
    fn set_high(&mut self) {
        self.high = true;
        self.log.push(Line::High(self.pin));
    }

    fn set_low(&mut self) {
        self.high = false;
        self.log.push(Line::Low(self.pin));
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

pub struct LogPort {
    log: LineLog,
}

impl LogPort {
    pub fn new(log: &LineLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DataPort for LogPort {
    fn write(&mut self, byte: u8) {
        self.log.push(Line::Data(byte));
    }

    fn read(&mut self) -> u8 {
        self.log.input.get()
    }

    fn set_direction(&mut self, direction: PortDirection) {
        self.log.push(Line::Direction(direction));
    }
}

/// Byte-level event seen by [`MockBus`], interleaved with delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    Command(u8),
    Data(u8),
    Read,
    Reset(bool),
    BeginBurst,
    EndBurst,
    /// Pixel submission of this many pixels
    Pixels(usize),
    DelayMs(u32),
}

pub type EventLog = Rc<RefCell<Vec<BusEvent>>>;

/// Delay that records instead of sleeping
#[derive(Default)]
pub struct MockDelay {
    log: Option<EventLog>,
    ns_total: u64,
    us_calls: usize,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: &EventLog) -> Self {
        Self {
            log: Some(log.clone()),
            ..Self::default()
        }
    }

    pub fn ns_total(&self) -> u64 {
        self.ns_total
    }

    /// Number of microsecond waits (completion polling)
    pub fn us_calls(&self) -> usize {
        self.us_calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.ns_total += ns as u64;
    }

    fn delay_us(&mut self, us: u32) {
        self.us_calls += 1;
        self.ns_total += us as u64 * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ns_total += ms as u64 * 1_000_000;
        if let Some(log) = &self.log {
            log.borrow_mut().push(BusEvent::DelayMs(ms));
        }
    }
}

/// Recording bus and transport with scripted completions
#[derive(Default)]
pub struct MockBus {
    pub log: EventLog,
    /// Bytes returned by successive reads
    pub reads: Vec<u8>,
    /// Pixels of every submission, in order
    pub submitted: Vec<Vec<Color>>,
    /// Every submission completes as soon as it is polled
    pub auto_complete: bool,
    /// Completions available when not auto-completing
    pub ready: usize,
    /// Submissions not yet retired
    pub pending: usize,
    /// Calls to poll_complete
    pub polls: usize,
    /// Fail the next submission
    pub fail_next: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            ..Self::default()
        }
    }

    pub fn auto() -> Self {
        Self {
            auto_complete: true,
            ..Self::default()
        }
    }

    pub fn take(&mut self) -> Vec<BusEvent> {
        core::mem::take(&mut *self.log.borrow_mut())
    }

    fn push(&self, event: BusEvent) {
        self.log.borrow_mut().push(event);
    }
}

impl Bus for MockBus {
    fn write_command(&mut self, opcode: u8) {
        self.push(BusEvent::Command(opcode));
    }

    fn write_data(&mut self, byte: u8) {
        self.push(BusEvent::Data(byte));
    }

    fn read_data(&mut self) -> u8 {
        self.push(BusEvent::Read);
        if self.reads.is_empty() {
            0
        } else {
            self.reads.remove(0)
        }
    }

    fn set_reset(&mut self, active: bool) {
        self.push(BusEvent::Reset(active));
    }

    fn begin_burst(&mut self) {
        self.push(BusEvent::BeginBurst);
    }

    fn end_burst(&mut self) {
        self.push(BusEvent::EndBurst);
    }
}

impl Transport for MockBus {
    type Error = ();

    fn submit(&mut self, pixels: &[Color], _encoding: PixelEncoding) -> Result<(), ()> {
        if self.fail_next {
            self.fail_next = false;
            return Err(());
        }
        self.push(BusEvent::Pixels(pixels.len()));
        self.submitted.push(pixels.to_vec());
        self.pending += 1;
        Ok(())
    }

    fn poll_complete(&mut self) -> Result<bool, ()> {
        self.polls += 1;
        if self.pending == 0 {
            return Ok(false);
        }
        if self.auto_complete {
            self.pending -= 1;
            return Ok(true);
        }
        if self.ready > 0 {
            self.ready -= 1;
            self.pending -= 1;
            return Ok(true);
        }
        Ok(false)
    }

    fn abandon(&mut self) {
        self.pending = 0;
    }
}

/// DMA channel with scripted completions
pub struct MockChannel {
    depth: usize,
    started: Vec<(Vec<u16>, bool)>,
    running: usize,
    finished: usize,
}

impl MockChannel {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            started: Vec::new(),
            running: 0,
            finished: 0,
        }
    }

    /// Let `n` more transfers complete
    pub fn finish(&mut self, n: usize) {
        self.finished += n;
    }

    pub fn started(&self) -> Vec<(Vec<u16>, bool)> {
        self.started.clone()
    }
}

impl DmaChannel for MockChannel {
    type Error = ();

    fn depth(&self) -> usize {
        self.depth
    }

    fn start(&mut self, words: &[u16], byte_swap: bool) -> Result<(), ()> {
        if self.running >= self.depth {
            return Err(());
        }
        self.started.push((words.to_vec(), byte_swap));
        self.running += 1;
        Ok(())
    }

    fn poll_done(&mut self) -> Result<bool, ()> {
        if self.running > 0 && self.finished > 0 {
            self.running -= 1;
            self.finished -= 1;
            return Ok(true);
        }
        Ok(false)
    }
}
