//! Supervisor loop around the messaging connection.
//!
//! Two states, looping forever: Connected runs the long-poll session;
//! any failure counts, logs, waits a fixed delay, and reconnects. Only a
//! graceful session end (ctrl-c shutdown of the dispatcher) leaves the
//! loop. The pause is injected so tests drive the loop deterministically.

use chrono::Local;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::core::config;
use crate::storage::store::TIMESTAMP_FORMAT;

/// Process-lifetime state of the messaging loop, shared with the web
/// surface. Not persisted.
#[derive(Debug, Default)]
pub struct RuntimeStatus {
    connected: AtomicBool,
    failures: AtomicU64,
    last_started: Mutex<Option<String>>,
}

impl RuntimeStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a (re)start of the messaging loop.
    pub fn mark_connected(&self) {
        self.connected.store(true, Ordering::SeqCst);
        if let Ok(mut started) = self.last_started.lock() {
            *started = Some(Local::now().format(TIMESTAMP_FORMAT).to_string());
        }
    }

    /// Records a failure of the messaging loop.
    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Cumulative failure count since process start.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Timestamp of the most recent (re)start, if any.
    pub fn last_started(&self) -> Option<String> {
        self.last_started.lock().ok().and_then(|guard| guard.clone())
    }
}

/// Runs `connect` sessions forever, pausing a fixed delay after each
/// failure. No retry cap: the loop is meant to run unattended.
///
/// `connect` yields `Ok(())` only on graceful shutdown, which ends the
/// loop. `pause` receives the configured retry delay; production passes
/// `tokio::time::sleep`, tests pass a recording no-op.
pub async fn run_forever<C, CFut, P, PFut>(status: &RuntimeStatus, mut connect: C, mut pause: P)
where
    C: FnMut() -> CFut,
    CFut: Future<Output = anyhow::Result<()>>,
    P: FnMut(Duration) -> PFut,
    PFut: Future<Output = ()>,
{
    loop {
        status.mark_connected();
        match connect().await {
            Ok(()) => {
                log::info!("messaging loop shut down gracefully");
                break;
            }
            Err(e) => {
                status.mark_disconnected();
                log::error!(
                    "messaging loop failed (failure #{}): {}; reconnecting in {}s",
                    status.failures(),
                    e,
                    config::retry::RETRY_DELAY_SECS
                );
                pause(config::retry::delay()).await;
            }
        }
    }
}
