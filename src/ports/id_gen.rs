//! ID generator port.

/// Generates unique identifiers.
///
/// Only used to give operator-added manual tasks a permanent key when
/// they were entered without one.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
