//! The fixed-capacity byte ring.
//!
//! # Invariants
//! - `head < capacity` and `tail < capacity`.
//! - `is_empty` is true exactly when the store holds zero bytes.
//! - The store is full exactly when `!is_empty && head == tail`.
//!
//! There is no occupancy counter; [`RingStore::count`] derives it from the
//! indices and the empty flag.
//!
//! # Saturation
//! A push against a full store is dropped. Older bytes are never overwritten.

use core::{cmp::Ordering, fmt, ops::Range};

use bstr::ByteSlice;

use crate::{ChannelOptions, ConfigError, ContractViolation, Substitution};

/// What happened to a byte handed to [`RingStore::add_byte`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The store was full; the byte was dropped.
    Rejected,
    /// The byte was appended unchanged.
    Stored,
    /// The byte completed the trigger, which was replaced.
    Substituted {
        /// Replacement bytes that fit.
        written: usize,
        /// Whether the store filled up before the whole replacement fit.
        truncated: bool,
    },
}

/// Lifetime counters of a store, reset by [`RingStore::clear`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Input bytes appended.
    pub accepted: u64,
    /// Input bytes refused because the store was full.
    pub rejected: u64,
    /// Trigger sequences rewritten.
    pub substitutions: u64,
    /// Replacement bytes lost to saturation.
    pub truncated_bytes: u64,
    /// Bytes handed to readers.
    pub delivered: u64,
}

/// Fixed-capacity circular byte store with an optional inline [`Substitution`].
///
/// `RingStore` is not synchronized; [`Channel`](crate::Channel) wraps it in a
/// lock for shared use.
pub struct RingStore {
    buf: Box<[u8]>,
    head: usize,
    tail: usize,
    is_empty: bool,
    substitution: Option<Substitution>,
    stats: Stats,
}

impl RingStore {
    /// Builds an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CapacityTooSmall`] when the requested capacity is
    /// below [`MIN_CAPACITY`](crate::MIN_CAPACITY).
    pub fn new(options: ChannelOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let ChannelOptions {
            capacity,
            substitution,
        } = options;

        let mut store = Self {
            buf: vec![0; capacity].into_boxed_slice(),
            head: 0,
            tail: 0,
            is_empty: true,
            substitution,
            stats: Stats::default(),
        };
        store.clear();
        Ok(store)
    }

    /// Resets to the empty state: zeroed storage, both indices at 0, counters
    /// cleared.
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.head = 0;
        self.tail = 0;
        self.is_empty = true;
        self.stats = Stats::default();
    }

    /// Number of bytes the store can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of bytes currently stored.
    #[must_use]
    pub fn count(&self) -> usize {
        match self.head.cmp(&self.tail) {
            Ordering::Greater => self.head - self.tail,
            Ordering::Less => self.capacity() - self.tail + self.head,
            Ordering::Equal if self.is_empty => 0,
            Ordering::Equal => self.capacity(),
        }
    }

    /// Whether the store holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// Whether every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        !self.is_empty && self.head == self.tail
    }

    /// The active rewrite rule, if any.
    #[must_use]
    pub fn substitution(&self) -> Option<&Substitution> {
        self.substitution.as_ref()
    }

    /// Counters since construction or the last [`clear`](Self::clear).
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Appends `byte`, then runs the substitution rule over the result.
    ///
    /// Both steps happen inside this one call; nothing can observe the store
    /// between the append and the rewrite.
    pub fn add_byte(&mut self, byte: u8) -> Insertion {
        if !self.push_raw(byte) {
            self.stats.rejected += 1;
            return Insertion::Rejected;
        }
        self.stats.accepted += 1;

        let Some(substitution) = self.substitution.take() else {
            return Insertion::Stored;
        };
        let outcome = substitution.apply(self);
        self.substitution = Some(substitution);
        outcome
    }

    /// Removes and returns the oldest byte.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::Empty`] when there is nothing to read. The store
    /// is left untouched.
    pub fn get_byte(&mut self) -> Result<u8, ContractViolation> {
        if self.is_empty {
            return Err(ContractViolation::Empty);
        }
        let byte = self.buf[self.tail];
        self.advance(1);
        Ok(byte)
    }

    /// Removes the oldest `len` bytes and returns them as at most two
    /// contiguous slices, in order.
    ///
    /// The second slice is non-empty only when the run crosses the physical
    /// end of the buffer. `len == 0` returns two empty slices and changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::Overdraw`] when `len` exceeds [`count`](Self::count).
    pub fn get_bytes(&mut self, len: usize) -> Result<(&[u8], &[u8]), ContractViolation> {
        let (first, second) = self.checked_spans(len)?;
        self.advance(len);
        Ok((&self.buf[first], &self.buf[second]))
    }

    /// Like [`get_bytes`](Self::get_bytes) without consuming anything.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::Overdraw`] when `len` exceeds [`count`](Self::count).
    pub fn peek_bytes(&self, len: usize) -> Result<(&[u8], &[u8]), ContractViolation> {
        let (first, second) = self.checked_spans(len)?;
        Ok((&self.buf[first], &self.buf[second]))
    }

    pub(crate) fn checked_spans(
        &self,
        len: usize,
    ) -> Result<(Range<usize>, Range<usize>), ContractViolation> {
        let available = self.count();
        if len > available {
            return Err(ContractViolation::Overdraw {
                requested: len,
                available,
            });
        }
        Ok(self.spans(len))
    }

    /// Index ranges of the oldest `len` bytes. Requires `len <= count()`.
    pub(crate) fn spans(&self, len: usize) -> (Range<usize>, Range<usize>) {
        debug_assert!(len <= self.count());
        if len == 0 {
            return (0..0, 0..0);
        }
        let first_len = len.min(self.capacity() - self.tail);
        (self.tail..self.tail + first_len, 0..len - first_len)
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> &[u8] {
        &self.buf[range]
    }

    /// Drops the oldest `len` bytes. Requires `len <= count()`.
    pub(crate) fn advance(&mut self, len: usize) {
        debug_assert!(len <= self.count());
        if len == 0 {
            return;
        }
        self.tail = (self.tail + len) % self.capacity();
        self.is_empty = self.tail == self.head;
        self.stats.delivered += len as u64;
    }

    /// Appends without running the substitution rule. Returns `false` when
    /// full.
    pub(crate) fn push_raw(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.buf[self.head] = byte;
        self.head = (self.head + 1) % self.capacity();
        self.is_empty = false;
        true
    }

    /// Byte `back` positions behind `head`; `back == 1` is the newest byte.
    pub(crate) fn byte_before_head(&self, back: usize) -> u8 {
        debug_assert!((1..=self.count()).contains(&back));
        let capacity = self.capacity();
        self.buf[(self.head + capacity - back) % capacity]
    }

    /// Deletes the newest `len` bytes. Requires `len <= count()`.
    pub(crate) fn rewind(&mut self, len: usize) {
        debug_assert!(len <= self.count());
        if len == 0 {
            return;
        }
        let capacity = self.capacity();
        self.head = (self.head + capacity - len) % capacity;
        self.is_empty = self.head == self.tail;
    }

    /// Panics unless the index invariants listed in the module docs hold.
    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let capacity = self.capacity();
        assert!(self.head < capacity, "head {} out of bounds", self.head);
        assert!(self.tail < capacity, "tail {} out of bounds", self.tail);
        if self.is_empty {
            assert_eq!(self.head, self.tail, "empty store with head != tail");
        }
        assert!(self.count() <= capacity);
    }

    pub(crate) fn record_rejected(&mut self, bytes: usize) {
        self.stats.rejected += bytes as u64;
    }

    pub(crate) fn record_substitution(&mut self, dropped: usize) {
        self.stats.substitutions += 1;
        self.stats.truncated_bytes += dropped as u64;
    }
}

impl fmt::Debug for RingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, second) = self.spans(self.count());
        let mut contents = Vec::with_capacity(self.count());
        contents.extend_from_slice(&self.buf[first]);
        contents.extend_from_slice(&self.buf[second]);

        f.debug_struct("RingStore")
            .field("capacity", &self.capacity())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("count", &self.count())
            .field("contents", &contents.as_bstr())
            .finish_non_exhaustive()
    }
}
