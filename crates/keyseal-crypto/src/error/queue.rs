//! Per-thread error queue
//!
//! Operations that report a semantic negative (`Ok(None)`, an `Invalid`
//! verification) still leave the underlying reason here so that a host can
//! drain it afterwards with [`error_string`].

use std::{cell::RefCell, collections::VecDeque};

use tracing::warn;

/// Maximum number of pending records per thread; the oldest is dropped first
pub const MAX_PENDING: usize = 16;

/// A single queued error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub code: u32,
    pub message: String,
}

/// Library name carried in the high byte of a packed code
pub fn library_name(code: u32) -> &'static str {
    match code >> 24 {
        1 => "crypto",
        2 => "key",
        3 => "core",
        _ => "unknown",
    }
}

/// Reason number carried in the low bytes of a packed code
pub fn reason(code: u32) -> u32 {
    code & 0x00ff_ffff
}

impl ErrorRecord {
    /// Render as `error:<CODE>:<lib>:<message>`
    pub fn render(&self) -> String {
        format!(
            "error:{:08X}:{}:{}",
            self.code,
            library_name(self.code),
            self.message
        )
    }
}

thread_local! {
    static QUEUE: RefCell<VecDeque<ErrorRecord>> =
        RefCell::new(VecDeque::with_capacity(MAX_PENDING));
}

/// Append a record to the calling thread's queue
pub fn push(code: u32, message: impl Into<String>) {
    let record = ErrorRecord {
        code,
        message: message.into(),
    };
    QUEUE.with(|q| {
        let mut q = q.borrow_mut();
        if q.len() == MAX_PENDING {
            q.pop_front();
        }
        q.push_back(record);
    });
}

/// Remove and return the oldest pending record
pub fn pop() -> Option<ErrorRecord> {
    QUEUE.with(|q| q.borrow_mut().pop_front())
}

/// Drop every pending record
pub fn clear() {
    QUEUE.with(|q| q.borrow_mut().clear());
}

/// Number of pending records
pub fn pending() -> usize {
    QUEUE.with(|q| q.borrow().len())
}

/// Pop one error as `(code, rendered message)`.
///
/// Returns `None` when the queue is empty. With `verbose` set, every record
/// still pending after the returned one is logged and the queue is cleared.
pub fn error_string(verbose: bool) -> Option<(u32, String)> {
    let record = pop()?;
    if verbose {
        QUEUE.with(|q| {
            for rest in q.borrow_mut().drain(..) {
                warn!(code = rest.code, "{}", rest.render());
            }
        });
    }
    Some((record.code, record.render()))
}
