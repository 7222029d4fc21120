//! Instrument error/event queue.
//!
//! Handlers report instrument-level faults by queuing an [`ErrorRecord`];
//! a controller drains them oldest-first with `SYSTem:ERRor?`. Popping an
//! empty queue is not an error: it yields the `0,"No error"` record.
//!
//! The queue owns every description it holds. Literals are stored as
//! borrowed `'static` text; formatted descriptions are moved in.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::fmt;

/// Description of the empty-queue record.
pub const NO_ERROR: &str = "No error";

/// One entry in the error queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    id: i32,
    description: Cow<'static, str>,
}

impl ErrorRecord {
    /// Create a record.
    pub fn new(id: i32, description: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    /// `0,"No error"`, returned when the queue is empty.
    pub fn no_error() -> Self {
        Self::new(0, NO_ERROR)
    }

    /// `-100,"Command error"`.
    pub fn command_error() -> Self {
        Self::new(-100, "Command error")
    }

    /// `-104,"Data type error"`.
    pub fn data_type_error() -> Self {
        Self::new(-104, "Data type error")
    }

    /// `-108,"Parameter not allowed"`.
    pub fn parameter_not_allowed() -> Self {
        Self::new(-108, "Parameter not allowed")
    }

    /// `-109,"Missing parameter"`.
    pub fn missing_parameter() -> Self {
        Self::new(-109, "Missing parameter")
    }

    /// `-113,"Undefined header"`.
    pub fn undefined_header() -> Self {
        Self::new(-113, "Undefined header")
    }

    /// `-222,"Data out of range"`.
    pub fn data_out_of_range() -> Self {
        Self::new(-222, "Data out of range")
    }

    /// `-350,"Queue overflow"`.
    pub fn queue_overflow() -> Self {
        Self::new(-350, "Queue overflow")
    }

    /// Numeric error code; negative for standard errors, 0 for none.
    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Description text.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Length of the description in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.description.len()
    }

    /// Whether the description is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
    }

    /// Take the description.
    pub fn into_description(self) -> Cow<'static, str> {
        self.description
    }
}

/// Standard `SYSTem:ERRor?` reply format: `<code>,"<description>"`.
impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},\"{}\"", self.id, self.description)
    }
}

/// FIFO of queued error records.
#[derive(Debug, Default)]
pub struct ErrorQueue {
    records: VecDeque<ErrorRecord>,
    capacity: Option<usize>,
}

impl ErrorQueue {
    /// Create an unbounded queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue holding at most `capacity` records.
    ///
    /// When full, the newest record is replaced by `-350,"Queue overflow"`
    /// and later errors are dropped until the queue is read. A capacity of
    /// zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Configured capacity, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Append a record at the tail.
    pub fn queue(&mut self, record: ErrorRecord) {
        if let Some(capacity) = self.capacity {
            if self.records.len() >= capacity {
                let overflow = ErrorRecord::queue_overflow();
                match self.records.back_mut() {
                    Some(last) if *last != overflow => {
                        tracing::warn!(
                            dropped = record.id(),
                            capacity,
                            "error queue full; recording overflow"
                        );
                        *last = overflow;
                    }
                    _ => {
                        tracing::debug!(dropped = record.id(), "error queue overflowed");
                    }
                }
                return;
            }
        }
        self.records.push_back(record);
    }

    /// Remove and return the oldest record, or `0,"No error"` if empty.
    pub fn pop(&mut self) -> ErrorRecord {
        self.records.pop_front().unwrap_or_else(ErrorRecord::no_error)
    }

    /// Oldest record without removing it.
    pub fn peek(&self) -> Option<&ErrorRecord> {
        self.records.front()
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Discard every queued record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter()
    }
}
