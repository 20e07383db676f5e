//! Password hashing with bcrypt. The stored string carries its own salt and cost.

pub use bcrypt::{BcryptError, DEFAULT_COST};

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;

pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(password, cost)
}

/// False for a wrong password and for a stored value that is not a bcrypt hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_and_is_salted() {
        let a = hash_password("hunter2", MIN_COST).unwrap();
        let b = hash_password("hunter2", MIN_COST).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a));
        assert!(verify_password("hunter2", &b));
        assert!(!verify_password("hunter3", &a));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("x", "no-separator"));
        assert!(!verify_password("x", ""));
    }

    #[test]
    fn test_out_of_range_cost_is_an_error() {
        assert!(hash_password("x", MIN_COST - 1).is_err());
    }
}
