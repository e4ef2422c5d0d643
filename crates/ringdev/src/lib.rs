//! A fixed-capacity byte ring shared by one writer and one reader.
//!
//! The core is [`RingStore`]: a circular buffer with a head index, a tail
//! index and an empty flag, which together tell "full" from "empty" without
//! an occupancy counter. Bytes enter one at a time through
//! [`RingStore::add_byte`], which also runs an inline [`Substitution`]: when
//! the newest three bytes spell the trigger (`UCF` by default) they are
//! replaced by a longer phrase before anyone can read them. Bytes leave either
//! one at a time or as up to two contiguous slices that may straddle the
//! physical end of the buffer.
//!
//! [`Channel`] puts the store behind a single lock. [`Transport`] owns a
//! channel and hands out a [`WriteEndpoint`] and a [`ReadEndpoint`].
//!
//! A full store drops new bytes and an empty store yields zero bytes; neither
//! is an error. Misuse, such as reading more than is stored, is reported as a
//! [`ContractViolation`] and leaves the store untouched.
//!
//! ```rust
//! use ringdev::{Channel, ChannelOptions};
//!
//! let channel = Channel::new(ChannelOptions::default()).unwrap();
//! channel.write(b"XUCFY");
//!
//! let spans = channel.get_bytes(channel.count()).unwrap();
//! assert_eq!(spans.to_vec(), b"XUndefeated 2018 National Champions UCFY");
//! ```

mod channel;
mod endpoint;
mod error;
mod filter;
mod options;
mod spans;
mod store;

#[cfg(test)]
mod tests;

pub use channel::Channel;
pub use endpoint::{ReadEndpoint, Transport, WriteEndpoint};
pub use error::{ConfigError, ContractViolation, EndpointError};
pub use filter::{REPLACEMENT, Substitution, TRIGGER, TRIGGER_LEN};
pub use options::{ChannelOptions, DEFAULT_CAPACITY, MIN_CAPACITY};
pub use spans::Spans;
pub use store::{Insertion, RingStore, Stats};
