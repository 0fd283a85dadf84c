// File: log.rs
// Created: 2026-10-16
// Description: Colored log prefixes and timing for CLI messages

// Colored string for log
pub const INFO: &str = "\x1b[1;32m[INFO]\x1b[0m";
pub const FAIL: &str = "\x1b[1;31m[FAIL]\x1b[0m";
pub const WARN: &str = "\x1b[1;33m[WARN]\x1b[0m";
pub const DONE: &str = "\x1b[1;34m[DONE]\x1b[0m";

pub fn log_msg(prefix: &str, msg: &str) -> String { format!("{} {}", prefix, msg) }
pub fn print_log_msg(prefix: &str, msg: &str) { eprintln!("{}", log_msg(prefix, msg)); }

/// Evaluate an expression and, when `verbose` holds, report how long it took.
#[macro_export]
macro_rules! measure_time {
    ($expr:expr, $verbose:expr) => {{
        let start = std::time::Instant::now();
        let result = $expr;
        if $verbose {
            $crate::utils::log::print_log_msg(
                $crate::utils::log::DONE,
                &format!("{} finished in {:.3?}", stringify!($expr), start.elapsed()),
            );
        }
        result
    }};
    ($expr:expr) => {
        $crate::measure_time!($expr, true)
    };
}
