//! Streaming chunk-size policy.
//!
//! Maps a payload's declared content length to the write-buffer size used
//! while streaming it to disk. Peak memory during a transfer is O(chunk
//! size), independent of total file size.

/// Payloads up to this size (1 MiB) use the smallest chunk tier.
pub const SMALL_PAYLOAD_MAX: u64 = 1024 * 1024;

/// Payloads up to this size (1 GiB) use the middle chunk tier.
pub const MEDIUM_PAYLOAD_MAX: u64 = 1024 * 1024 * 1024;

/// Chunk size for small payloads (1 KiB).
pub const SMALL_CHUNK_SIZE: usize = 1024;

/// Chunk size for medium payloads (1 MiB).
pub const MEDIUM_CHUNK_SIZE: usize = 1024 * 1024;

/// Chunk size for large payloads (10 MiB).
pub const LARGE_CHUNK_SIZE: usize = 1024 * 1024 * 10;

/// Returns the streaming chunk size for a declared content length.
///
/// The mapping is a monotonic three-tier step function: small files get
/// small chunks (low syscall overhead matters little, memory matters less),
/// huge files get 10 MiB chunks (bounded buffer, fewer writes). An unknown
/// length is reported as `0` and lands in the smallest tier, a conservative
/// slow-but-safe default.
#[must_use]
pub fn chunk_size_for(content_length: u64) -> usize {
    if content_length <= SMALL_PAYLOAD_MAX {
        SMALL_CHUNK_SIZE
    } else if content_length <= MEDIUM_PAYLOAD_MAX {
        MEDIUM_CHUNK_SIZE
    } else {
        LARGE_CHUNK_SIZE
    }
}
