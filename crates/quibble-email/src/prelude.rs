pub use quibble_types::error::{Error, QbResult};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
