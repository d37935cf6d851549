//! DMA channel abstraction
//!
//! A channel that clocks 16-bit words out of memory onto the parallel bus
//! in the background (I2S/LCD-mode peripherals, PIO state machines, etc.).
//! The peripheral emits the low byte of each word first unless
//! `byte_swap` is set.

/// Background word transfer
pub trait DmaChannel {
    /// Error reported by the peripheral
    type Error;

    /// Number of transfers the peripheral can have outstanding at once
    fn depth(&self) -> usize {
        1
    }

    /// Start clocking out `words`
    ///
    /// The caller keeps `words` unmodified until [`DmaChannel::poll_done`]
    /// has reported this transfer as complete. Transfers complete in the
    /// order they were started.
    fn start(&mut self, words: &[u16], byte_swap: bool) -> Result<(), Self::Error>;

    /// Retire the oldest outstanding transfer if it has finished
    ///
    /// Returns `Ok(true)` once per completed transfer, `Ok(false)` while the
    /// oldest one is still running or nothing is outstanding.
    fn poll_done(&mut self) -> Result<bool, Self::Error>;
}
