use serde::Serialize;

use crate::constants::limits::MIN_PASSWORD_LENGTH;

/// Advisory result of [`evaluate_strength`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// 0..=4
    pub score: u8,
    pub message: String,
    /// Registration accepts the password only when this is set.
    pub valid: bool,
}

/// Score a password.
///
/// One point each for: at least eight characters, both lower and upper case,
/// a digit, a character that is not an ASCII letter or digit. A password is
/// valid with at least eight characters, an uppercase letter and a digit.
///
/// Letter and digit classes are ASCII only, so `É` counts as special and not
/// as uppercase.
#[must_use]
pub fn evaluate_strength(password: &str) -> PasswordStrength {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let score: u8 = [long_enough, has_upper && has_lower, has_digit, has_special]
        .iter()
        .map(|&passed| u8::from(passed))
        .sum();

    let valid = long_enough && has_upper && has_digit;

    let label = match score {
        0 | 1 => "Weak",
        2 => "Fair",
        3 => "Good",
        _ => "Strong",
    };

    let message = if valid {
        label.to_string()
    } else if !long_enough {
        format!("{label}: use at least {MIN_PASSWORD_LENGTH} characters")
    } else if !has_upper {
        format!("{label}: add an uppercase letter")
    } else {
        format!("{label}: add a number")
    };

    PasswordStrength {
        score,
        message,
        valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_lowercase_is_weak() {
        let strength = evaluate_strength("abc");
        assert!(!strength.valid);
        assert_eq!(strength.score, 0);
        assert!(strength.message.starts_with("Weak"));
    }

    #[test]
    fn test_minimum_valid_password() {
        let strength = evaluate_strength("Abcdef12");
        assert!(strength.valid);
        assert!(strength.score >= 3);
        assert_eq!(strength.message, "Good");
    }

    #[test]
    fn test_special_character_reaches_max_score() {
        let strength = evaluate_strength("Abcdef12!");
        assert!(strength.valid);
        assert_eq!(strength.score, 4);
        assert_eq!(strength.message, "Strong");
    }

    #[test]
    fn test_missing_uppercase_is_invalid() {
        let strength = evaluate_strength("abcdefg1");
        assert!(!strength.valid);
        assert_eq!(strength.score, 2);
        assert_eq!(strength.message, "Fair: add an uppercase letter");
    }

    #[test]
    fn test_missing_digit_is_invalid() {
        let strength = evaluate_strength("Abcdefgh!");
        assert!(!strength.valid);
        assert_eq!(strength.score, 3);
        assert_eq!(strength.message, "Good: add a number");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 7 characters, 8+ bytes
        assert!(!evaluate_strength("Ééééé1a").valid);
    }

    #[test]
    fn test_non_ascii_letters_count_as_special() {
        // no ASCII uppercase, so invalid; 'É' is the special character
        let strength = evaluate_strength("Ébcdefg1");
        assert!(!strength.valid);
        assert_eq!(strength.score, 3);
        assert_eq!(strength.message, "Good: add an uppercase letter");

        let strength = evaluate_strength("Abcdéfg1");
        assert!(strength.valid);
        assert_eq!(strength.score, 4);
    }
}
