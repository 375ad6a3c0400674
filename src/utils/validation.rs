//! Form input validation
//!
//! Checks the login and signup forms run before submitting: email shape,
//! username shape, password composition and password confirmation. Every
//! function here is pure and never panics on user input.

use crate::locale::Locale;
use crate::models::{Agreements, LoginCredentials, SignupCredentials};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Minimum password score accepted by the signup form
pub const MIN_PASSWORD_SCORE: u8 = 3;

/// Minimum password length that earns the length point
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const USERNAME_MIN_CHARS: usize = 2;
pub const USERNAME_MAX_CHARS: usize = 20;

// Hardcoded patterns; a compile failure here is a source bug.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9가-힣]+$").expect("username regex is valid"));

/// A form field an error can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
    /// Errors not tied to a single input, such as unchecked agreements
    General,
}

impl Field {
    fn prompt(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Field::Username, Locale::En) => "a username",
            (Field::Username, Locale::Ko) => "사용자명을",
            (Field::Email, Locale::En) => "an email address",
            (Field::Email, Locale::Ko) => "이메일을",
            (Field::Password, Locale::En) => "a password",
            (Field::Password, Locale::Ko) => "비밀번호를",
            (Field::ConfirmPassword, Locale::En) => "the password confirmation",
            (Field::ConfirmPassword, Locale::Ko) => "비밀번호 확인을",
            (Field::General, Locale::En) => "the form",
            (Field::General, Locale::Ko) => "양식을",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Username => "username",
            Field::Email => "email",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm_password",
            Field::General => "general",
        };
        f.write_str(name)
    }
}

/// A rejected form input
///
/// `Display` renders the English message; use [`ValidationError::message`]
/// for other locales.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter {}.", .0.prompt(Locale::En))]
    Required(Field),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Username must be between {min} and {max} characters.")]
    UsernameLength { min: usize, max: usize },

    #[error("Username may only contain English letters, Korean characters and digits.")]
    UsernameCharset,

    #[error("Password strength: {}", .0.feedback(Locale::En))]
    WeakPassword(PasswordStrength),

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Please agree to the terms of service.")]
    TermsNotAccepted,

    #[error("Please agree to the privacy policy.")]
    PrivacyNotAccepted,
}

impl ValidationError {
    /// Renders the message in the given locale
    pub fn message(&self, locale: Locale) -> String {
        if locale == Locale::En {
            return self.to_string();
        }

        match self {
            ValidationError::Required(field) => format!("{} 입력해주세요.", field.prompt(locale)),
            ValidationError::InvalidEmail => "올바른 이메일 형식을 입력해주세요.".to_string(),
            ValidationError::UsernameLength { min, max } => {
                format!("사용자명은 {}-{}자 사이로 입력해주세요.", min, max)
            }
            ValidationError::UsernameCharset => {
                "사용자명은 영문, 한글, 숫자만 사용 가능합니다.".to_string()
            }
            ValidationError::WeakPassword(strength) => {
                format!("비밀번호 강도: {}", strength.feedback(locale))
            }
            ValidationError::PasswordMismatch => "비밀번호가 일치하지 않습니다.".to_string(),
            ValidationError::TermsNotAccepted => "서비스 이용약관에 동의해주세요.".to_string(),
            ValidationError::PrivacyNotAccepted => "개인정보처리방침에 동의해주세요.".to_string(),
        }
    }
}

/// A password composition rule that earns one strength point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCriterion {
    MinLength,
    Lowercase,
    Uppercase,
    Digit,
    Special,
}

impl PasswordCriterion {
    /// Short hint telling the user what to add
    pub fn label(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (PasswordCriterion::MinLength, Locale::En) => "at least 8 characters",
            (PasswordCriterion::MinLength, Locale::Ko) => "최소 8자 이상",
            (PasswordCriterion::Lowercase, Locale::En) => "a lowercase letter",
            (PasswordCriterion::Lowercase, Locale::Ko) => "소문자 포함",
            (PasswordCriterion::Uppercase, Locale::En) => "an uppercase letter",
            (PasswordCriterion::Uppercase, Locale::Ko) => "대문자 포함",
            (PasswordCriterion::Digit, Locale::En) => "a digit",
            (PasswordCriterion::Digit, Locale::Ko) => "숫자 포함",
            (PasswordCriterion::Special, Locale::En) => "a special character",
            (PasswordCriterion::Special, Locale::Ko) => "특수문자 포함",
        }
    }
}

/// Result of scoring a password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    /// Number of criteria met, 0 to 5
    pub score: u8,
    /// Unmet criteria in evaluation order
    pub missing: Vec<PasswordCriterion>,
}

impl PasswordStrength {
    /// Unmet criteria joined with ", ", empty when the score is 5
    pub fn feedback(&self, locale: Locale) -> String {
        self.missing
            .iter()
            .map(|c| c.label(locale))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_too_weak(&self) -> bool {
        self.score < MIN_PASSWORD_SCORE
    }
}

/// Checks that an email looks like `local@domain.tld`
///
/// Deliberately loose: any non-whitespace local part and domain are accepted
/// as long as the domain contains a dot.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validates a username
///
/// # Errors
/// - `Required` when empty
/// - `UsernameLength` when shorter than 2 or longer than 20 characters
/// - `UsernameCharset` when it contains anything but Latin letters,
///   Hangul syllables and digits
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Required(Field::Username));
    }

    let len = username.chars().count();
    if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&len) {
        return Err(ValidationError::UsernameLength {
            min: USERNAME_MIN_CHARS,
            max: USERNAME_MAX_CHARS,
        });
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::UsernameCharset);
    }

    Ok(())
}

/// Scores a password against the five composition criteria
///
/// Letters and digits are ASCII classes, so any other character (Hangul
/// included) counts as special.
pub fn check_password_strength(password: &str) -> PasswordStrength {
    let checks = [
        (
            PasswordCriterion::MinLength,
            password.chars().count() >= MIN_PASSWORD_LENGTH,
        ),
        (
            PasswordCriterion::Lowercase,
            password.chars().any(|c| c.is_ascii_lowercase()),
        ),
        (
            PasswordCriterion::Uppercase,
            password.chars().any(|c| c.is_ascii_uppercase()),
        ),
        (
            PasswordCriterion::Digit,
            password.chars().any(|c| c.is_ascii_digit()),
        ),
        (
            PasswordCriterion::Special,
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ),
    ];

    let missing: Vec<PasswordCriterion> = checks
        .iter()
        .filter(|(_, met)| !met)
        .map(|(criterion, _)| *criterion)
        .collect();

    PasswordStrength {
        score: (checks.len() - missing.len()) as u8,
        missing,
    }
}

/// Checks that the confirmation is exactly the password
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), ValidationError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// Errors collected from a whole form, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<Field, ValidationError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    /// Records an error, replacing any earlier one for the same field
    pub fn insert(&mut self, field: Field, error: ValidationError) {
        self.errors.insert(field, error);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    /// Converts into `Ok(())` when no field was rejected
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn check_email_field(email: &str, errors: &mut FormErrors) {
    if email.is_empty() {
        errors.insert(Field::Email, ValidationError::Required(Field::Email));
    } else if !is_valid_email(email) {
        errors.insert(Field::Email, ValidationError::InvalidEmail);
    }
}

/// Validates the login form
pub fn validate_login(credentials: &LoginCredentials) -> FormErrors {
    let mut errors = FormErrors::default();

    check_email_field(&credentials.email, &mut errors);

    if credentials.password.is_empty() {
        errors.insert(Field::Password, ValidationError::Required(Field::Password));
    }

    errors
}

/// Validates the signup form and its policy agreements
///
/// When both agreements are unchecked only the privacy policy error is
/// reported in the general slot.
pub fn validate_signup(credentials: &SignupCredentials, agreements: &Agreements) -> FormErrors {
    let mut errors = FormErrors::default();

    if let Err(e) = validate_username(&credentials.username) {
        errors.insert(Field::Username, e);
    }

    check_email_field(&credentials.email, &mut errors);

    if credentials.password.is_empty() {
        errors.insert(Field::Password, ValidationError::Required(Field::Password));
    } else {
        let strength = check_password_strength(&credentials.password);
        if strength.is_too_weak() {
            errors.insert(Field::Password, ValidationError::WeakPassword(strength));
        }
    }

    if credentials.confirm_password.is_empty() {
        errors.insert(
            Field::ConfirmPassword,
            ValidationError::Required(Field::ConfirmPassword),
        );
    } else if let Err(e) =
        validate_password_confirmation(&credentials.password, &credentials.confirm_password)
    {
        errors.insert(Field::ConfirmPassword, e);
    }

    if !agreements.terms_of_service {
        errors.insert(Field::General, ValidationError::TermsNotAccepted);
    }
    if !agreements.privacy_policy {
        errors.insert(Field::General, ValidationError::PrivacyNotAccepted);
    }

    errors
}
