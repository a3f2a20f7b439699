//! Error type shared by every fallible `KeyedMap` operation.

/// Contract violations reported by the map and its strategies.
///
/// None of these are transient: retrying the same call fails the same way.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum KeyedMapError {
    /// The operation has no implementation and never will succeed.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// The operation is only meaningful in a different state of the map.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// The key reports no hash code and therefore cannot be stored.
    #[error("key has no hash code and cannot be used in a keyed map")]
    IneligibleKey,
}

#[cfg(test)]
mod tests {
    use super::KeyedMapError;

    #[test]
    fn messages_name_the_operation() {
        let e = KeyedMapError::Unsupported("entry_set");
        assert_eq!(e.to_string(), "unsupported operation: entry_set");
        let e = KeyedMapError::InvalidState("hash_code of a mutable map is unstable");
        assert_eq!(
            e.to_string(),
            "invalid state: hash_code of a mutable map is unstable"
        );
        assert!(KeyedMapError::IneligibleKey
            .to_string()
            .contains("no hash code"));
    }
}
