/// Serde helper functions for custom serialization/deserialization
/// of stats and dump structures

/// Skip serializing if value is default (for use with skip_serializing_if)
pub fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    value == &T::default()
}

/// Skip serializing if value is zero
pub fn is_zero_usize(value: &usize) -> bool {
    *value == 0
}

/// Skip serializing if value is zero
pub fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_serializing_helpers() {
        assert!(is_default(&0u64));
        assert!(!is_default(&1u64));
        assert!(is_zero_usize(&0));
        assert!(!is_zero_usize(&1));
        assert!(is_zero_u64(&0));
        assert!(!is_zero_u64(&1));
    }
}
