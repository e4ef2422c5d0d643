//! Relays text from a writer thread to a reader thread through one
//! transport, the way a pair of write-only and read-only device nodes would
//! share a kernel buffer.
//!
//! The writer pushes a few lines, some of which contain the trigger `UCF`;
//! the reader drains whatever is available and prints it. The channel is
//! kept at its minimum size so the later, longer lines saturate it and get
//! truncated.
//!
//! Run with
//!
//! ```bash
//! RUST_LOG=ringdev=debug cargo run -p ringdev --example relay
//! ```

use std::{
    io::{self, Write as _},
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use ringdev::{ChannelOptions, EndpointError, Transport};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // USE RUST_LOG=debug to see logs
    let env_filter = EnvFilter::builder().from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();

    let transport = Transport::new(ChannelOptions::default())?;
    let writer = transport.write_endpoint();
    let reader = transport.read_endpoint();
    let done = AtomicBool::new(false);

    let lines: Vec<String> = vec![
        "Knights win the opener, UCF 42 - 7\n".to_owned(),
        "Go UCF!\n".to_owned(),
        "no trigger in this one\n".to_owned(),
        "UCF ".repeat(40) + "\n",
    ];

    thread::scope(|s| -> Result<(), EndpointError> {
        let producer = s.spawn(|| -> Result<(), EndpointError> {
            for line in &lines {
                let consumed = writer.write(line.as_bytes())?;
                info!(consumed, offered = line.len(), "line written");
                thread::sleep(Duration::from_millis(20));
            }
            done.store(true, Ordering::Release);
            Ok(())
        });

        let mut stdout = io::stdout().lock();
        loop {
            let finished = done.load(Ordering::Acquire);
            let n = reader.read_to(256, &mut stdout)?;
            if n == 0 {
                if finished {
                    break;
                }
                thread::sleep(Duration::from_millis(5));
            }
        }
        stdout.flush()?;
        producer
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    })?;

    let stats = transport.channel().stats();
    info!(?stats, "relay finished");
    Ok(())
}
