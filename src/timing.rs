//! Timing constants for bring-up and gesture decoding, in milliseconds.
//!
//! Tuned against the IQS7211E reference trackpad running the
//! [`MemoryMap::DEFAULT`](crate::MemoryMap::DEFAULT) settings.

/// Settle time after requesting a software reset.
pub const RESET_SETTLE_MS: u32 = 50;

/// Ready wait used before routine register transactions.
pub const READY_TIMEOUT_MS: u32 = 100;

/// Ready wait used around the reset-acknowledge handshake and before reading
/// a sample.
pub const SHORT_READY_TIMEOUT_MS: u32 = 50;

/// Ready wait before entering event mode; ATI can keep the device busy.
pub const LONG_READY_TIMEOUT_MS: u32 = 500;

/// Pause after acknowledging the reset before ATI is requested.
pub const ACK_SETTLE_MS: u32 = 100;

/// Interval between ATI completion checks.
pub const AUTO_TUNE_POLL_MS: u32 = 5;

/// Number of ATI completion checks before bring-up gives up.
pub const AUTO_TUNE_POLL_ATTEMPTS: u32 = 30;

/// How long a tap-generated click stays pressed.
pub const CLICK_RELEASE_MS: u32 = 50;

/// Longest touch that still counts as a tap.
pub const TAP_MAX_DURATION_MS: u32 = 200;

/// Largest travel (|dx| + |dy|, in trackpad units) that still counts as a tap.
pub const TAP_MAX_TRAVEL: u32 = 50;

/// A second tap within this window of the first starts a drag.
pub const DOUBLE_TAP_WINDOW_MS: u32 = 400;

/// A tap older than this can no longer pair into a double tap.
pub const TAP_EXPIRY_MS: u32 = 600;
