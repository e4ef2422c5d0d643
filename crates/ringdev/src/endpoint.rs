//! The transport and its two endpoint shells.
//!
//! A [`Transport`] owns the shared [`Channel`]. It hands out a
//! [`WriteEndpoint`] and a [`ReadEndpoint`], each holding only a weak handle:
//! the channel lives exactly as long as the transport, whichever endpoint is
//! created or dropped first. Using an endpoint after its transport is gone is
//! a caller bug and reports [`ContractViolation::Detached`].
//!
//! Creating and dropping an endpoint is the "open" and "close" of a
//! connection. Both are bookkeeping only and never touch the stored bytes.

use std::{
    convert::Infallible,
    io,
    sync::{
        Arc, Weak,
        atomic::{AtomicUsize, Ordering},
    },
};

use tracing::{debug, info};

use crate::{Channel, ChannelOptions, ConfigError, ContractViolation, EndpointError};

/// Owner of the shared channel.
///
/// # Examples
///
/// ```rust
/// use ringdev::{ChannelOptions, Transport};
///
/// let transport = Transport::new(ChannelOptions::default()).unwrap();
/// let writer = transport.write_endpoint();
/// let reader = transport.read_endpoint();
///
/// assert_eq!(writer.write(b"GO UCF!").unwrap(), 7);
///
/// let mut out = [0u8; 64];
/// let n = reader.read(&mut out).unwrap();
/// assert_eq!(&out[..n], b"GO Undefeated 2018 National Champions UCF!");
/// ```
#[derive(Debug)]
pub struct Transport {
    channel: Arc<Channel>,
    next_endpoint: AtomicUsize,
}

impl Transport {
    /// Builds the channel described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `options` fail validation.
    pub fn new(options: ChannelOptions) -> Result<Self, ConfigError> {
        let capacity = options.capacity;
        let substitution = options.substitution.is_some();
        let channel = Arc::new(Channel::new(options)?);
        info!(capacity, substitution, "transport initialized");
        Ok(Self {
            channel,
            next_endpoint: AtomicUsize::new(0),
        })
    }

    /// The shared channel, for inspection or a reset through
    /// [`Channel::clear`].
    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Opens a write-capability handle.
    #[must_use]
    pub fn write_endpoint(&self) -> WriteEndpoint {
        WriteEndpoint {
            conn: Connection::open(self, Role::Writer),
        }
    }

    /// Opens a read-capability handle.
    #[must_use]
    pub fn read_endpoint(&self) -> ReadEndpoint {
        ReadEndpoint {
            conn: Connection::open(self, Role::Reader),
        }
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        info!(
            endpoints_opened = self.next_endpoint.load(Ordering::Relaxed),
            "transport shut down"
        );
    }
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Writer,
    Reader,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::Writer => "writer",
            Role::Reader => "reader",
        }
    }
}

#[derive(Debug)]
struct Connection {
    channel: Weak<Channel>,
    id: usize,
    role: Role,
}

impl Connection {
    fn open(transport: &Transport, role: Role) -> Self {
        let id = transport.next_endpoint.fetch_add(1, Ordering::Relaxed);
        debug!(id, role = role.as_str(), "endpoint opened");
        Self {
            channel: Arc::downgrade(&transport.channel),
            id,
            role,
        }
    }

    fn channel(&self) -> Result<Arc<Channel>, ContractViolation> {
        self.channel.upgrade().ok_or(ContractViolation::Detached)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!(id = self.id, role = self.role.as_str(), "endpoint closed");
    }
}

/// Write side of a [`Transport`].
#[derive(Debug)]
pub struct WriteEndpoint {
    conn: Connection,
}

impl WriteEndpoint {
    /// Transport-unique id of this endpoint.
    #[must_use]
    pub fn id(&self) -> usize {
        self.conn.id
    }

    /// Inserts `data` one byte at a time, each subject to the substitution
    /// rule, stopping early once the channel is full.
    ///
    /// Returns how many bytes of `data` were consumed; fewer than
    /// `data.len()` means the channel saturated.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::Detached`] when the transport is gone.
    pub fn write(&self, data: &[u8]) -> Result<usize, EndpointError> {
        let channel = self.conn.channel()?;
        Ok(channel.write(data))
    }
}

impl io::Write for WriteEndpoint {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(WriteEndpoint::write(self, buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read side of a [`Transport`].
#[derive(Debug)]
pub struct ReadEndpoint {
    conn: Connection,
}

impl ReadEndpoint {
    /// Transport-unique id of this endpoint.
    #[must_use]
    pub fn id(&self) -> usize {
        self.conn.id
    }

    /// Moves up to `dst.len()` of the oldest bytes into `dst` and returns how
    /// many were moved; 0 when the channel is empty.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::Detached`] when the transport is gone.
    pub fn read(&self, dst: &mut [u8]) -> Result<usize, EndpointError> {
        let channel = self.conn.channel()?;
        let Ok(n) = channel.read_with(dst.len(), |first, second| {
            let (head, rest) = dst.split_at_mut(first.len());
            head.copy_from_slice(first);
            rest[..second.len()].copy_from_slice(second);
            Ok::<(), Infallible>(())
        });
        Ok(n)
    }

    /// Moves up to `len` of the oldest bytes into `sink`.
    ///
    /// Bytes are consumed only once `sink` has accepted all of them. If `sink`
    /// fails, the channel keeps every byte, though `sink` may already hold a
    /// prefix of them.
    ///
    /// # Errors
    ///
    /// [`EndpointError::Io`] when `sink` fails and
    /// [`ContractViolation::Detached`] when the transport is gone.
    pub fn read_to<W>(&self, len: usize, sink: &mut W) -> Result<usize, EndpointError>
    where
        W: io::Write + ?Sized,
    {
        let channel = self.conn.channel()?;
        let n = channel.read_with(len, |first, second| {
            sink.write_all(first)?;
            sink.write_all(second)
        })?;
        Ok(n)
    }
}

impl io::Read for ReadEndpoint {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(ReadEndpoint::read(self, buf)?)
    }
}
