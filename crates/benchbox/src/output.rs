//! Output bounding
//!
//! Captured program output is cut to a fixed maximum size, keeping the
//! leading bytes, before it is handed back to the caller.

/// Default maximum output size in bytes
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 4096;

/// Bound `output` to at most `max_bytes`, keeping the prefix.
///
/// Returns the (possibly truncated) output and whether truncation happened.
/// Pure and idempotent: bounding an already-bounded output is a no-op.
pub fn bound_output(mut output: Vec<u8>, max_bytes: usize) -> (Vec<u8>, bool) {
    if output.len() > max_bytes {
        output.truncate(max_bytes);
        (output, true)
    } else {
        (output, false)
    }
}
