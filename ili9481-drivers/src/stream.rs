//! Double-buffered pixel streaming
//!
//! Two frame buffers alternate: the application composes into the
//! writable one while the transport drains the other. Each submitted run
//! of pixels is a transaction in a bounded FIFO; when the FIFO is full the
//! next enqueue waits for the oldest transaction to complete.
//!
//! ```text
//!            swap_buffers()                 completion
//!  Filling ─────────────────▶ InFlight ─────────────────▶ Idle
//!     ▲                                                    │
//!     └────────────── buffer_mut() (next swap) ────────────┘
//! ```
//!
//! Any command ends the controller's memory write, so every path that
//! issues commands re-arms the addressing window before returning.
//!
//! A transfer that does not complete within the configured timeout is
//! fatal: outstanding transactions are abandoned, the addressing window is
//! forgotten and the engine refuses to stream until [`StreamingEngine::recover`].

use embedded_hal::delay::DelayNs;
use heapless::Deque;
use ili9481_core::color::Color;
use ili9481_core::command::Command;
use ili9481_core::config::{DriverConfig, MAX_QUEUE_DEPTH};
use ili9481_core::{ConfigError, Window};

use crate::error::DriverError;
use crate::sequencer;
use crate::transport::{PixelEncoding, Transport};

/// Interval between completion polls
const POLL_INTERVAL_US: u32 = 10;

/// One of the two frame buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferId {
    A,
    B,
}

impl BufferId {
    const fn index(self) -> usize {
        match self {
            BufferId::A => 0,
            BufferId::B => 1,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            BufferId::A => BufferId::B,
            BufferId::B => BufferId::A,
        }
    }
}

/// Lifecycle of a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferState {
    /// Writable by the application
    Filling,
    /// Owned by the transport until its transactions complete
    InFlight,
    /// Neither writable nor in flight
    Idle,
}

/// Outstanding transfer of part of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transaction {
    buffer: BufferId,
    offset: usize,
    len: usize,
}

type Result<T, E> = core::result::Result<T, DriverError<E>>;

/// Streaming engine over a transport `T`, waiting with `D`, with frame
/// buffers of `N` pixels
pub struct StreamingEngine<T, D, const N: usize> {
    transport: T,
    delay: D,
    buffers: [[Color; N]; 2],
    writable: BufferId,
    in_flight: [usize; 2],
    queue: Deque<Transaction, MAX_QUEUE_DEPTH>,
    depth: usize,
    chunk: usize,
    encoding: PixelEncoding,
    timeout_us: u64,
    width: u16,
    height: u16,
    window: Option<Window>,
    faulted: bool,
}

impl<T, D, const N: usize> StreamingEngine<T, D, N>
where
    T: Transport,
    D: DelayNs,
{
    /// Build an engine; both buffers start zeroed and A is writable
    pub fn new(transport: T, delay: D, config: &DriverConfig) -> core::result::Result<Self, ConfigError> {
        config.validate_for_buffer(N)?;

        let encoding = PixelEncoding::new(config.panel.pixel_format, config.byte_order);
        if !transport.supports(encoding) {
            return Err(ConfigError::UnsupportedPixelFormat);
        }
        if config.queue_depth > transport.max_outstanding() {
            return Err(ConfigError::InvalidQueueDepth);
        }

        Ok(Self {
            transport,
            delay,
            buffers: [[0; N]; 2],
            writable: BufferId::A,
            in_flight: [0; 2],
            queue: Deque::new(),
            depth: config.queue_depth,
            chunk: config.chunk_pixels,
            encoding,
            timeout_us: config.transfer_timeout_ms as u64 * 1_000,
            width: config.width,
            height: config.height,
            window: None,
            faulted: false,
        })
    }

    /// The writable buffer
    ///
    /// Waits for any transfer still reading it from an earlier swap.
    pub fn buffer_mut(&mut self) -> Result<&mut [Color; N], T::Error> {
        self.reclaim(self.writable)?;
        Ok(&mut self.buffers[self.writable.index()])
    }

    /// Which buffer is writable
    pub fn writable(&self) -> BufferId {
        self.writable
    }

    pub fn state(&self, id: BufferId) -> BufferState {
        if self.in_flight[id.index()] > 0 {
            BufferState::InFlight
        } else if id == self.writable {
            BufferState::Filling
        } else {
            BufferState::Idle
        }
    }

    /// Outstanding transactions
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Currently armed addressing window
    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn encoding(&self) -> PixelEncoding {
        self.encoding
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// Queue `len` pixels of `buffer` starting at `offset`
    ///
    /// Blocks for the oldest transaction when the queue is full. This is the
    /// only place the engine waits on the transport besides draining.
    pub fn enqueue(&mut self, buffer: BufferId, offset: usize, len: usize) -> Result<(), T::Error> {
        self.check_ready()?;
        if self.window.is_none() {
            return Err(DriverError::WindowNotArmed);
        }
        if len == 0 || offset.checked_add(len).map_or(true, |end| end > N) {
            return Err(DriverError::Config(ConfigError::InvalidChunkSize));
        }

        if self.queue.len() >= self.depth {
            self.retire_oldest()?;
        }

        let tx = Transaction {
            buffer,
            offset,
            len,
        };
        self.queue
            .push_back(tx)
            .map_err(|_| DriverError::Config(ConfigError::InvalidQueueDepth))?;

        let pixels = &self.buffers[buffer.index()][offset..offset + len];
        if let Err(err) = self.transport.submit(pixels, self.encoding) {
            self.queue.pop_back();
            return Err(DriverError::Transport(err));
        }
        self.in_flight[buffer.index()] += 1;
        Ok(())
    }

    /// Wait until every queued transaction has completed
    pub fn drain(&mut self) -> Result<(), T::Error> {
        while !self.queue.is_empty() {
            self.retire_oldest()?;
        }
        Ok(())
    }

    /// Stream the first `len` pixels of the writable buffer and flip buffers
    pub fn write_pixels(&mut self, len: usize) -> Result<(), T::Error> {
        self.check_ready()?;
        if self.window.is_none() {
            return Err(DriverError::WindowNotArmed);
        }
        if len == 0 || len > N {
            return Err(DriverError::Config(ConfigError::InvalidChunkSize));
        }
        let current = self.writable;
        let mut offset = 0;
        while offset < len {
            let n = (len - offset).min(self.chunk);
            self.enqueue(current, offset, n)?;
            offset += n;
        }
        self.writable = current.other();
        Ok(())
    }

    /// Stream the whole writable buffer and flip buffers
    pub fn swap_buffers(&mut self) -> Result<(), T::Error> {
        self.write_pixels(N)
    }

    /// Arm an addressing window after draining outstanding pixels
    pub fn set_window(&mut self, window: Window) -> Result<(), T::Error> {
        self.check_ready()?;
        self.drain()?;
        sequencer::set_window(&mut self.transport, &mut self.delay, &window)?;
        self.window = Some(window);
        Ok(())
    }

    /// Arm the window `(x, y)-(x+w-1, y+h-1)`, checked against the panel
    pub fn set_window_area(&mut self, x: u16, y: u16, w: u16, h: u16) -> Result<(), T::Error> {
        let window = Window::from_area(x, y, w, h, self.width, self.height)?;
        self.set_window(window)
    }

    /// Fill a rectangle with one color
    ///
    /// The writable buffer is filled once and streamed repeatedly in
    /// chunks until the whole area is covered. Returns after the last
    /// chunk completes.
    pub fn fill_area(&mut self, color: Color, x: u16, y: u16, w: u16, h: u16) -> Result<(), T::Error> {
        let window = Window::from_area(x, y, w, h, self.width, self.height)?;
        self.set_window(window)?;

        let current = self.writable;
        self.buffers[current.index()].fill(color);

        let mut remaining = window.area();
        while remaining > 0 {
            let n = remaining.min(self.chunk);
            self.enqueue(current, 0, n)?;
            remaining -= n;
        }
        self.drain()
    }

    /// Replay a command sequence with exclusive use of the bus
    ///
    /// The previously armed window, or the full screen if none was, is
    /// armed again afterwards.
    pub fn run_sequence(&mut self, sequence: &[Command<'_>]) -> Result<usize, T::Error> {
        let window = self.window.unwrap_or(Window::full(self.width, self.height));
        self.window = None;
        let count = self.with_bus(|bus, delay| sequencer::run(bus, delay, sequence))?;
        self.set_window(window)?;
        Ok(count)
    }

    /// Drain, hand the bus and delay to `f`, then re-arm the armed window
    pub fn with_bus<R>(&mut self, f: impl FnOnce(&mut T, &mut D) -> R) -> Result<R, T::Error> {
        self.check_ready()?;
        self.drain()?;
        let result = f(&mut self.transport, &mut self.delay);
        if let Some(window) = self.window {
            sequencer::set_window(&mut self.transport, &mut self.delay, &window)?;
        }
        Ok(result)
    }

    /// Clear a fault after a timeout; the panel must be re-initialized
    pub fn recover(&mut self) {
        self.transport.abandon();
        self.queue.clear();
        self.in_flight = [0; 2];
        self.window = None;
        self.faulted = false;
    }

    fn check_ready(&self) -> Result<(), T::Error> {
        if self.faulted {
            Err(DriverError::Faulted)
        } else {
            Ok(())
        }
    }

    /// Wait until `id` has no outstanding transactions
    fn reclaim(&mut self, id: BufferId) -> Result<(), T::Error> {
        while self.in_flight[id.index()] > 0 {
            self.retire_oldest()?;
        }
        Ok(())
    }

    /// Wait for the oldest transaction and drop it from the queue
    fn retire_oldest(&mut self) -> Result<(), T::Error> {
        let Some(&tx) = self.queue.front() else {
            return Ok(());
        };

        let mut waited_us = 0u64;
        loop {
            match self.transport.poll_complete() {
                Ok(true) => break,
                Ok(false) => {}
                Err(err) => {
                    self.fault();
                    return Err(DriverError::Transport(err));
                }
            }
            if waited_us >= self.timeout_us {
                error!("transfer of {} pixels timed out", tx.len);
                self.fault();
                return Err(DriverError::TransferTimeout);
            }
            self.delay.delay_us(POLL_INTERVAL_US);
            waited_us += POLL_INTERVAL_US as u64;
        }

        self.queue.pop_front();
        self.in_flight[tx.buffer.index()] -= 1;
        Ok(())
    }

    fn fault(&mut self) {
        self.recover();
        self.faulted = true;
    }
}
