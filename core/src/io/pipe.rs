use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Condvar, Mutex, MutexGuard};

use crate::io::{IoError, ProgramIo};

/// Shared byte queue feeding a machine's input.
///
/// The writer side (a controller, a front-end bridge) pushes bytes as
/// the user types; the executor thread blocks in `pop_blocking` until
/// something arrives. `cancel` wakes a blocked reader and makes further
/// reads fail until `reset`, which is how a stop request interrupts an
/// executor stuck inside IN.
pub struct ByteQueue {
    inner: Mutex<QueueInner>,
    cond: Condvar,
}

#[derive(Default)]
struct QueueInner {
    bytes: VecDeque<u8>,
    closed: bool,
    cancelled: bool,
}

impl ByteQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, data: &[u8]) {
        let mut inner = self.lock();
        if inner.closed {
            return;
        }
        inner.bytes.extend(data);
        self.cond.notify_all();
    }

    /// No more input will arrive; blocked readers see EOF once the
    /// queue drains.
    pub fn close(&self) {
        self.lock().closed = true;
        self.cond.notify_all();
    }

    /// Abort reads immediately, without draining buffered bytes.
    pub fn cancel(&self) {
        self.lock().cancelled = true;
        self.cond.notify_all();
    }

    /// Clear bytes and flags for a fresh run.
    pub fn reset(&self) {
        *self.lock() = QueueInner::default();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().bytes.is_empty()
    }

    pub fn pop_blocking(&self) -> Result<Option<u8>, IoError> {
        let mut inner = self.lock();
        loop {
            if inner.cancelled {
                return Err(IoError::Cancelled);
            }
            if let Some(byte) = inner.bytes.pop_front() {
                return Ok(Some(byte));
            }
            if inner.closed {
                return Ok(None);
            }
            inner = self
                .cond
                .wait(inner)
                .unwrap_or_else(|e| e.into_inner());
        }
    }
}

impl Default for ByteQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Program output and diagnostics multiplexed to the bridge thread.
#[derive(Debug)]
pub enum BridgeEvent {
    Output(u8),
    Diag(String),
}

/// Machine-side endpoint of the controller's I/O plumbing: input from a
/// shared [`ByteQueue`], output and diagnostics as [`BridgeEvent`]s on
/// an mpsc channel drained by the bridge thread.
pub struct PipeIo {
    input: std::sync::Arc<ByteQueue>,
    events: mpsc::Sender<BridgeEvent>,
}

impl PipeIo {
    pub fn new(input: std::sync::Arc<ByteQueue>, events: mpsc::Sender<BridgeEvent>) -> Self {
        Self { input, events }
    }
}

impl ProgramIo for PipeIo {
    fn read_byte(&mut self) -> Result<Option<u8>, IoError> {
        self.input.pop_blocking()
    }

    fn write_byte(&mut self, byte: u8) {
        let _ = self.events.send(BridgeEvent::Output(byte));
    }

    fn write_diag(&mut self, msg: &str) {
        let _ = self.events.send(BridgeEvent::Diag(msg.to_string()));
    }

    fn input_pending(&self) -> bool {
        !self.input.is_empty()
    }
}
