use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{ChannelOptions, ConfigError, ContractViolation, Insertion, RingStore, Spans, Stats};

/// A [`RingStore`] behind one whole-store lock.
///
/// Every operation, including the backward trigger scan that follows each
/// insert, runs start to finish under the lock. Nothing blocks waiting for
/// room or for data: a full store drops writes and an empty one yields zero
/// bytes.
///
/// The read-only queries ([`count`](Self::count), [`is_empty`](Self::is_empty),
/// [`is_full`](Self::is_full), [`stats`](Self::stats)) take the same lock, so
/// each answer is a consistent snapshot. It may be stale by the time the
/// caller looks at it.
#[derive(Debug)]
pub struct Channel {
    store: Mutex<RingStore>,
}

impl Channel {
    /// Builds an empty channel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `options` fail validation.
    pub fn new(options: ChannelOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            store: Mutex::new(RingStore::new(options)?),
        })
    }

    /// Empties the channel. See [`RingStore::clear`].
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Inserts one byte and applies the substitution rule, as one indivisible
    /// step.
    pub fn add_byte(&self, byte: u8) -> Insertion {
        self.store.lock().add_byte(byte)
    }

    /// Removes and returns the oldest byte.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::Empty`] when the channel holds nothing.
    pub fn get_byte(&self) -> Result<u8, ContractViolation> {
        self.store.lock().get_byte()
    }

    /// Removes the oldest `len` bytes and hands back a view of them.
    ///
    /// The returned [`Spans`] holds the lock; other callers wait until it is
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::Overdraw`] when `len` exceeds the stored count.
    pub fn get_bytes(&self, len: usize) -> Result<Spans<'_>, ContractViolation> {
        let mut store = self.store.lock();
        let (first, second) = store.checked_spans(len)?;
        store.advance(len);
        Ok(Spans::new(store, first, second))
    }

    /// Inserts `data` byte by byte until it is exhausted or the channel is
    /// full, and returns how many bytes were consumed.
    ///
    /// A short count is the saturation outcome, not an error.
    pub fn write(&self, data: &[u8]) -> usize {
        let mut store = self.store.lock();
        let mut consumed = 0;
        for &byte in data {
            if store.is_full() {
                break;
            }
            store.add_byte(byte);
            consumed += 1;
        }

        if consumed < data.len() {
            let dropped = data.len() - consumed;
            store.record_rejected(dropped);
            debug!(consumed, dropped, "buffer has been filled; write truncated");
        }
        consumed
    }

    /// Hands up to `max` of the oldest bytes to `copy`, then consumes them if
    /// `copy` succeeds.
    ///
    /// When `copy` fails its error is returned and the channel is left exactly
    /// as it was. Returns the number of bytes consumed, 0 when empty.
    ///
    /// # Errors
    ///
    /// Whatever `copy` returns.
    pub fn read_with<F, E>(&self, max: usize, copy: F) -> Result<usize, E>
    where
        F: FnOnce(&[u8], &[u8]) -> Result<(), E>,
    {
        let mut store = self.store.lock();
        let len = max.min(store.count());
        if len == 0 {
            return Ok(0);
        }

        let (first, second) = store.spans(len);
        copy(store.slice(first), store.slice(second))?;
        store.advance(len);

        if store.is_empty() {
            trace!(len, "buffer has been emptied");
        }
        Ok(len)
    }

    /// Number of bytes the channel can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    /// Stored byte count. See [`RingStore::count`].
    #[must_use]
    pub fn count(&self) -> usize {
        self.store.lock().count()
    }

    /// Whether the channel holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Whether every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.store.lock().is_full()
    }

    /// See [`RingStore::assert_invariants`].
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        self.store.lock().assert_invariants();
    }

    /// Counters since construction or the last [`clear`](Self::clear).
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.store.lock().stats()
    }
}
