// ── Site domain type ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// A physical premises under the vendor account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Opaque vendor identifier, used in every site-scoped API path.
    pub id: String,
    /// Human-friendly display name.
    pub label: String,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.id)
    }
}
