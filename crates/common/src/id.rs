//! ID and token generation.

use ulid::Ulid;
use uuid::Uuid;

/// Length of a generated record ID.
pub const ID_LENGTH: usize = 26;

/// ID generator for entities and session tokens.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new lowercase ULID record ID.
    ///
    /// IDs sort lexicographically by creation time.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque session token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // v4 only: tokens must not leak their creation time
        Uuid::new_v4().simple().to_string()
    }
}
