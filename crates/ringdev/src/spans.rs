use core::{fmt, ops::Range};

use bstr::ByteSlice;
use parking_lot::MutexGuard;

use crate::RingStore;

/// Bytes removed by [`Channel::get_bytes`](crate::Channel::get_bytes), still
/// sitting in the store.
///
/// The view keeps the channel locked for as long as it lives, so no writer can
/// reuse the slots it points into. Drop it promptly.
///
/// Concatenating [`first`](Self::first) and [`second`](Self::second) yields the
/// bytes in the order repeated [`get_byte`](crate::Channel::get_byte) calls
/// would have returned them.
pub struct Spans<'a> {
    store: MutexGuard<'a, RingStore>,
    first: Range<usize>,
    second: Range<usize>,
}

impl<'a> Spans<'a> {
    pub(crate) fn new(
        store: MutexGuard<'a, RingStore>,
        first: Range<usize>,
        second: Range<usize>,
    ) -> Self {
        Self {
            store,
            first,
            second,
        }
    }

    /// The run starting at the old read index.
    #[must_use]
    pub fn first(&self) -> &[u8] {
        self.store.slice(self.first.clone())
    }

    /// The wrapped remainder from the start of the buffer; empty unless the
    /// run crossed the physical end.
    #[must_use]
    pub fn second(&self) -> &[u8] {
        self.store.slice(self.second.clone())
    }

    /// Both slices, in order.
    #[must_use]
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        (self.first(), self.second())
    }

    /// Total bytes covered by both slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// Whether the view covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The covered bytes in read order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.first().iter().chain(self.second()).copied()
    }

    /// Copies the covered bytes into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(self.first());
        out.extend_from_slice(self.second());
        out
    }
}

impl fmt::Debug for Spans<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spans")
            .field("first", &self.first().as_bstr())
            .field("second", &self.second().as_bstr())
            .finish()
    }
}
