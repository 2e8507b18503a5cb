//! Simple profiling macros with a process-wide section registry
//!
//! Lightweight profiling without changing function signatures.
//! Enable with environment variable: SNAKE_PROFILE=1

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

const UNKNOWN: u8 = 0;
const DISABLED: u8 = 1;
const ENABLED: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(UNKNOWN);

/// Accumulated timings of one named section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionStats {
    pub calls: u64,
    pub total_ns: u64,
}

static SECTIONS: Mutex<Vec<(&'static str, SectionStats)>> = parking_lot::const_mutex(Vec::new());

#[inline]
pub fn is_profiling_enabled() -> bool {
    match STATE.load(Ordering::Relaxed) {
        ENABLED => true,
        DISABLED => false,
        _ => {
            let enabled = std::env::var("SNAKE_PROFILE").is_ok();
            set_enabled(enabled);
            enabled
        }
    }
}

/// Overrides the environment switch
pub fn set_enabled(enabled: bool) {
    STATE.store(if enabled { ENABLED } else { DISABLED }, Ordering::Relaxed);
}

pub struct ProfileGuard {
    start: Instant,
    section: &'static str,
}

impl ProfileGuard {
    pub fn new(section: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                section,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;
        let mut sections = SECTIONS.lock();
        match sections.iter_mut().find(|(name, _)| *name == self.section) {
            Some((_, stats)) => {
                stats.calls += 1;
                stats.total_ns += elapsed_ns;
            }
            None => sections.push((
                self.section,
                SectionStats {
                    calls: 1,
                    total_ns: elapsed_ns,
                },
            )),
        }
    }
}

/// Copy of the registry, in first-seen order
pub fn snapshot() -> Vec<(&'static str, SectionStats)> {
    SECTIONS.lock().clone()
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    // Sections nest (paranoia runs tactics which run searches), so shares can exceed 100%
    for (name, stats) in snapshot() {
        let ms = stats.total_ns as f64 / 1_000_000.0;
        let pct = if total_ns > 0 {
            100.0 * stats.total_ns as f64 / total_ns as f64
        } else {
            0.0
        };
        let avg_us = if stats.calls > 0 {
            stats.total_ns as f64 / (stats.calls * 1000) as f64
        } else {
            0.0
        };
        eprintln!("{}:", name);
        eprintln!("  Time:     {:.2}ms ({:.1}%)", ms, pct);
        eprintln!("  Calls:    {}", stats.calls);
        eprintln!("  Avg:      {:.2}µs/call\n", avg_us);
    }

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

#[macro_export]
macro_rules! profile {
    ($section:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($section);
        $code
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_profiler_records_sections() {
        set_enabled(true);
        let value = crate::profile!("profiler_test", { 40 + 2 });
        assert_eq!(value, 42);

        let recorded = snapshot()
            .into_iter()
            .find(|(name, _)| *name == "profiler_test")
            .map(|(_, stats)| stats.calls)
            .unwrap_or(0);
        assert!(recorded >= 1);
        set_enabled(false);
    }
}
