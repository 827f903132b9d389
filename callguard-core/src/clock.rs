// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Time Sources
//!
//! The signaling channel never sleeps. Reconnect timers are deadlines checked
//! against a [`Clock`] whenever the owner polls, so tests can move time
//! forward by hand with [`ManualClock`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Abstraction over time sources.
///
/// `now_ms` is wall-clock time used for identifiers (user ids, call SIDs).
/// `monotonic_now` is used for reconnect deadlines.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current wall-clock time in milliseconds since UNIX epoch.
    fn now_ms(&self) -> u64;

    /// Returns a monotonic instant for deadline comparisons.
    fn monotonic_now(&self) -> Instant;
}

/// Production clock backed by `SystemTime` and `Instant`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn monotonic_now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Both the wall clock and the monotonic clock move only when
/// [`ManualClock::advance`] is called.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    wall_origin_ms: u64,
    elapsed_ms: AtomicU64,
}

impl ManualClock {
    /// Creates a clock whose wall time starts at `wall_origin_ms`.
    pub fn new(wall_origin_ms: u64) -> Self {
        ManualClock {
            origin: Instant::now(),
            wall_origin_ms,
            elapsed_ms: AtomicU64::new(0),
        }
    }

    /// Moves both clocks forward.
    pub fn advance(&self, by: Duration) {
        self.elapsed_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Total simulated time since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        // 2023-11-14T22:13:20Z, an arbitrary fixed starting point
        ManualClock::new(1_700_000_000_000)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.wall_origin_ms + self.elapsed_ms.load(Ordering::SeqCst)
    }

    fn monotonic_now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}
