//! Message origin filtering.
//!
//! Selects which gateway events get mirrored: only messages posted in
//! the configured Discord channel qualify. Everything else is dropped
//! without a log entry.

/// Whether an event from `origin_channel_id` should be forwarded.
///
/// Exact string equality; identifiers are opaque and case-sensitive.
pub fn should_forward(origin_channel_id: &str, mirrored_channel_id: &str) -> bool {
    origin_channel_id == mirrored_channel_id
}
