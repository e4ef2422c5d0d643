use crate::{ConfigError, Substitution};

/// Smallest capacity a store may be built with.
pub const MIN_CAPACITY: usize = 1024;

/// Capacity used by [`ChannelOptions::default`].
pub const DEFAULT_CAPACITY: usize = MIN_CAPACITY;

/// Construction-time configuration for a [`RingStore`](crate::RingStore) and
/// everything layered on top of it.
///
/// Options are fixed for the lifetime of the store; there is no way to resize
/// or swap the substitution rule afterwards.
///
/// # Examples
///
/// ```rust
/// use ringdev::{Channel, ChannelOptions};
///
/// // A plain FIFO with no inline rewriting.
/// let channel = Channel::new(ChannelOptions {
///     capacity: 4096,
///     substitution: None,
/// })
/// .unwrap();
/// assert_eq!(channel.capacity(), 4096);
/// ```
///
/// # Default
///
/// [`DEFAULT_CAPACITY`] bytes with the default [`Substitution`] enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ChannelOptions {
    /// Number of bytes the store can hold. Must be at least [`MIN_CAPACITY`].
    ///
    /// # Default
    ///
    /// [`DEFAULT_CAPACITY`]
    pub capacity: usize,

    /// Rewrite rule applied to every inserted byte, or `None` to store bytes
    /// verbatim.
    ///
    /// # Default
    ///
    /// `Some(Substitution::default())`
    pub substitution: Option<Substitution>,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            substitution: Some(Substitution::default()),
        }
    }
}

impl ChannelOptions {
    /// Checks the options without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CapacityTooSmall`] when `capacity` is below
    /// [`MIN_CAPACITY`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < MIN_CAPACITY {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.capacity,
                minimum: MIN_CAPACITY,
            });
        }
        Ok(())
    }
}
