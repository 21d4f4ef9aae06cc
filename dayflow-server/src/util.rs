//! Shared utility functions for dayflow-server

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Fallback employee id minted when a profile row is created implicitly
/// during an employee update. Not a business-meaningful identifier.
pub fn fallback_employee_id() -> String {
    let short = &uuid::Uuid::new_v4().simple().to_string()[..8];
    format!("EMP-{short}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("Secret#1").unwrap();
        assert!(verify_password("Secret#1", &hash));
        assert!(!verify_password("secret#1", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_fallback_employee_id_shape() {
        let id = fallback_employee_id();
        assert!(id.starts_with("EMP-"));
        assert_eq!(id.len(), 12);
    }
}
