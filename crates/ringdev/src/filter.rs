//! Inline trigger rewriting.
//!
//! Every byte that enters a [`RingStore`] is checked, while the store is still
//! borrowed mutably, against a three byte trigger. When the newest three bytes
//! spell the trigger they are deleted and the replacement is appended in their
//! place, so a trigger produced by the writer never reaches a reader.
//!
//! The replacement is appended with the raw, non-filtering push. That matters
//! for the default rule: its replacement ends in the trigger, and re-running the
//! filter over it would loop until the store filled up.

use std::borrow::Cow;

use tracing::trace;

use crate::{Insertion, RingStore};

/// Length of every trigger sequence.
pub const TRIGGER_LEN: usize = 3;

/// Trigger of the default rule.
pub const TRIGGER: [u8; TRIGGER_LEN] = *b"UCF";

/// Replacement of the default rule.
pub const REPLACEMENT: &[u8] = b"Undefeated 2018 National Champions UCF";

/// A "trigger sequence → replacement phrase" rewrite rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Substitution {
    trigger: [u8; TRIGGER_LEN],
    replacement: Cow<'static, [u8]>,
}

impl Default for Substitution {
    fn default() -> Self {
        Self::new(TRIGGER, REPLACEMENT)
    }
}

impl Substitution {
    /// Builds a rule replacing `trigger` with `replacement`.
    ///
    /// The replacement may contain the trigger; it is never re-scanned.
    pub fn new(trigger: [u8; TRIGGER_LEN], replacement: impl Into<Cow<'static, [u8]>>) -> Self {
        Self {
            trigger,
            replacement: replacement.into(),
        }
    }

    /// The sequence that activates the rule.
    #[must_use]
    pub fn trigger(&self) -> &[u8; TRIGGER_LEN] {
        &self.trigger
    }

    /// The bytes written in place of the trigger.
    #[must_use]
    pub fn replacement(&self) -> &[u8] {
        &self.replacement
    }

    /// Runs the rule against the byte that was just pushed onto `store`.
    ///
    /// Must be called in the same exclusive borrow as that push: the backward
    /// scan reads positions relative to `head`.
    pub(crate) fn apply(&self, store: &mut RingStore) -> Insertion {
        if !self.completed_by_last_push(store) {
            return Insertion::Stored;
        }

        store.rewind(TRIGGER_LEN);

        // After the rewind `head == tail` can only mean "empty": the store held
        // at least the trigger, so it is no longer full and the first byte goes in.
        let mut written = 0;
        for &byte in self.replacement.iter() {
            if !store.push_raw(byte) {
                break;
            }
            written += 1;
        }

        let dropped = self.replacement.len() - written;
        store.record_substitution(dropped);
        trace!(written, dropped, "substituted trigger sequence");

        Insertion::Substituted {
            written,
            truncated: dropped > 0,
        }
    }

    /// Whether the newest `TRIGGER_LEN` bytes equal the trigger.
    ///
    /// The walk goes back from `head` and never crosses `tail`; the oldest
    /// compared position may be `tail` itself.
    fn completed_by_last_push(&self, store: &RingStore) -> bool {
        if store.count() < TRIGGER_LEN {
            return false;
        }
        self.trigger
            .iter()
            .rev()
            .enumerate()
            .all(|(back, &expected)| store.byte_before_head(back + 1) == expected)
    }
}
