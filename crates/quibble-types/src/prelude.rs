pub use crate::error::{Error, QbResult};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
