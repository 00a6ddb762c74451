//! Constants for the download module.

use std::time::Duration;

/// Per-attempt request timeout (30 seconds, connect through last body byte).
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
