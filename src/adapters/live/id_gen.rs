//! Live adapter for the `IdGenerator` port.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Live ID generator that produces random UUIDs.
pub struct LiveIdGenerator;

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_unique_ids() {
        let id1 = LiveIdGenerator.generate_id();
        let id2 = LiveIdGenerator.generate_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 32);
    }
}
