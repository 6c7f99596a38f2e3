use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 大写字母或数字开头，可包含连字符，如 "MATH-101"
static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]*$").expect("Invalid course code regex"));

const WEAK_PASSWORDS: [&str; 9] = [
    "password",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "password1",
    "abcd1234",
    "football1",
    "letmein123",
];

pub const MAX_COURSE_CREDITS: f64 = 10.0;

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略：至少 8 位，包含大写、小写与数字，且不在常见弱密码表中。
/// 返回全部未满足的条目。
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    errors
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let errors = password_violations(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

pub fn validate_course_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 || code.len() > 20 {
        return Err("Course code length must be between 2 and 20 characters");
    }
    if !COURSE_CODE_RE.is_match(code) {
        return Err("Course code must contain only uppercase letters, digits or hyphens");
    }
    Ok(())
}

pub fn validate_credits(credits: f64) -> Result<(), String> {
    if !credits.is_finite() || credits <= 0.0 || credits > MAX_COURSE_CREDITS {
        return Err(format!(
            "Credits must be greater than 0 and at most {MAX_COURSE_CREDITS}"
        ));
    }
    Ok(())
}

pub fn validate_points_total(points_total: f64) -> Result<(), &'static str> {
    if !points_total.is_finite() || points_total <= 0.0 {
        return Err("points_total must be greater than 0");
    }
    Ok(())
}

pub fn validate_late_deduction(late_deduction: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&late_deduction) {
        return Err("late_deduction must be between 0 and 100");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("coach_k").is_ok());
        assert!(validate_username("qb-12").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("seventeen_chars_x").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("athlete@academy.org").is_ok());
        assert!(validate_email("first.last+tag@mail.example.com").is_ok());
        assert!(validate_email("no-at-sign.org").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecurePass123").is_ok());
        assert!(validate_password("Touchdown7").is_ok());
    }

    #[test]
    fn test_password_violations() {
        let errors = password_violations("ab1");
        assert!(errors.contains(&"Password must be at least 8 characters long"));
        assert!(errors.contains(&"Password must contain at least one uppercase letter"));

        let errors = password_violations("ABCDE1234");
        assert_eq!(
            errors,
            vec!["Password must contain at least one lowercase letter"]
        );

        let errors = password_violations("Football1");
        assert_eq!(
            errors,
            vec!["Password is too common, please choose a stronger password"]
        );
    }

    #[test]
    fn test_course_code() {
        assert!(validate_course_code("MATH-101").is_ok());
        assert!(validate_course_code("PE1").is_ok());
        assert!(validate_course_code("math-101").is_err());
        assert!(validate_course_code("-MATH").is_err());
        assert!(validate_course_code("X").is_err());
        assert!(validate_course_code("ABCDEFGHIJKLMNOPQRSTU").is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(validate_credits(0.5).is_ok());
        assert!(validate_credits(10.0).is_ok());
        assert!(validate_credits(0.0).is_err());
        assert!(validate_credits(10.5).is_err());
        assert!(validate_credits(f64::NAN).is_err());

        assert!(validate_points_total(1.0).is_ok());
        assert!(validate_points_total(0.0).is_err());

        assert!(validate_late_deduction(0.0).is_ok());
        assert!(validate_late_deduction(100.0).is_ok());
        assert!(validate_late_deduction(-1.0).is_err());
        assert!(validate_late_deduction(f64::NAN).is_err());
    }
}
