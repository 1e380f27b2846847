//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable. Values that users may
//! want to change also have a config counterpart (see `config.rs`).

/// Interval between auto-refresh ticks in seconds.
pub const AUTO_REFRESH_SECS: u64 = 10;

/// Age in seconds after which the on-disk message snapshot is ignored.
pub const CACHE_EXPIRY_SECS: u64 = 300;

/// Attempts made by the retry policy before giving up (first try included).
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Base delay for rate-limit backoff in milliseconds.
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;

/// Upper bound for a single rate-limit backoff in milliseconds.
pub const RETRY_MAX_DELAY_MS: u64 = 10_000;

/// Ceiling for automatic re-issue of a failed read in the session controller.
/// Reaching it leaves a persistent error until the user refreshes.
pub const SESSION_RETRY_CEILING: u32 = 3;

/// Per-attempt delay step for controller-level re-issues (attempt n waits n steps).
pub const SESSION_RETRY_STEP_MS: u64 = 1_000;

/// Timeout applied to whole one-shot commands in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Seconds before the temporary HTML file opened in the browser is removed.
pub const HTML_FILE_CLEANUP_SECS: u64 = 30;

/// Error message display duration in seconds before auto-dismiss.
pub const ERROR_TTL_SECS: u64 = 5;

// === Layout ===

/// Terminal widths below this use the narrow column set.
pub const NARROW_BREAKPOINT: u16 = 80;

/// Terminal widths below this (and at least `NARROW_BREAKPOINT`) use the medium set.
pub const WIDE_BREAKPOINT: u16 = 120;

/// Columns narrower than this are cut hard instead of at word boundaries.
pub const MIN_WORD_TRUNCATE_WIDTH: usize = 10;

/// Attachments addressable by the digit keys.
pub const MAX_NUMBERED_ATTACHMENTS: usize = 9;

/// Spinner animation frame duration in milliseconds.
pub const SPINNER_FRAME_MS: u128 = 80;

/// Input poll timeout while a request is in flight (keeps the spinner moving).
pub const POLL_BUSY_MS: u64 = 50;

/// Input poll timeout when idle.
pub const POLL_IDLE_MS: u64 = 150;
