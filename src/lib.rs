//! Data model and hook host for record-routing scripts.

/// Hook trait, instance configuration, reference script, and the host harness.
pub mod hook;
/// Tagged array values, message envelopes, channels, and the frame codec.
pub mod record;
