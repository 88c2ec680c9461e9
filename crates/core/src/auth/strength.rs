//! Password strength rules.

/// Shortest password accepted.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Checks a candidate password and returns every rule it breaks.
///
/// An empty vector means the password is acceptable. `email` is the account
/// email (when known); passwords equal to it or to its local part are refused.
#[must_use]
pub fn validate_password_strength(password: &str, email: Option<&str>) -> Vec<String> {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
        ));
    }

    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    if let Some(email) = email {
        let lowered = password.to_lowercase();
        let email = email.to_lowercase();
        let local = email.split('@').next().unwrap_or_default();
        if lowered == email || (!local.is_empty() && lowered == local) {
            problems.push("The password is too similar to the email address.".to_string());
        }
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("correct-horse-battery", None, 0)]
    #[case("short", None, 1)]
    #[case("12345678", None, 1)]
    #[case("1234", None, 2)]
    #[case("alice.smith", Some("alice.smith@example.com"), 1)]
    #[case("Alice.Smith@Example.com", Some("alice.smith@example.com"), 1)]
    #[case("alice.smith!", Some("alice.smith@example.com"), 0)]
    fn test_password_strength(
        #[case] password: &str,
        #[case] email: Option<&str>,
        #[case] problems: usize,
    ) {
        assert_eq!(validate_password_strength(password, email).len(), problems);
    }
}
