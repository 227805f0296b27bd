//! Input validation and normalization
//!
//! Provides the checks shared by registration and profile updates:
//! - user name format
//! - phone number normalization to E.164
//! - feedback comments
//!
//! Failures are collected in a [`FieldErrors`] map keyed by field name so a
//! handler can pick the one error that belongs to the step it is processing.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::core::config::validation::{MAX_FEEDBACK_LENGTH, MAX_NAME_LENGTH};

#[allow(clippy::expect_used)]
static USER_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w[\w\s]*$").expect("user name regex"));

#[allow(clippy::expect_used)]
static LOCAL_PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0\d{9}$").expect("local phone regex"));

#[allow(clippy::expect_used)]
static E164_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").expect("e164 regex"));

/// Field name to error message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Upper-cases the first character: "invalid phonenumber used" -> "Invalid phonenumber used"
pub fn to_sentence_case(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Checks a user or company name.
pub fn validate_user_name(name: &str) -> Result<(), String> {
    if !USER_NAME_RE.is_match(name) {
        return Err("user name should have at least one character and contain only alpha numeric value".into());
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!("user name should not be longer than {} characters", MAX_NAME_LENGTH));
    }
    Ok(())
}

/// Normalizes a phone number to E.164.
///
/// Whitespace is removed, a local `0XXXXXXXXX` number gets the default
/// calling code, anything else gets a leading `+` when missing. The result
/// must be a valid number for its region according to libphonenumber's
/// metadata, otherwise `None` is returned.
///
/// # Examples
/// ```
/// use jobboard::core::validation::normalize_phone;
///
/// assert_eq!(normalize_phone("0911 223344", "251").as_deref(), Some("+251911223344"));
/// assert_eq!(normalize_phone("251911223344", "251").as_deref(), Some("+251911223344"));
/// assert_eq!(normalize_phone("12", "251"), None);
/// ```
pub fn normalize_phone(raw: &str, country_code: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let phone = if LOCAL_PHONE_RE.is_match(&compact) {
        format!("+{}{}", country_code, &compact[1..])
    } else if compact.starts_with('+') {
        compact
    } else {
        format!("+{}", compact)
    };

    // libphonenumber also accepts punctuation and vanity letters; only plain digits get this far.
    if !E164_RE.is_match(&phone) {
        return None;
    }

    let number = phonenumber::parse(None, &phone).ok()?;
    if !number.is_valid() {
        return None;
    }
    Some(number.format().mode(phonenumber::Mode::E164).to_string())
}

/// Formats an E.164 number the way locals dial it: `+251911223344` -> `0911223344`
pub fn local_phone_format(phone: &str, country_code: &str) -> String {
    phone.replace(&format!("+{}", country_code), "0")
}

/// Checks a feedback comment.
pub fn validate_feedback(comment: &str) -> Result<(), String> {
    if comment.trim().is_empty() {
        return Err("feedback comment can not be empty".into());
    }
    if comment.chars().count() > MAX_FEEDBACK_LENGTH {
        return Err(format!("feedback comment can not exceed {} characters", MAX_FEEDBACK_LENGTH));
    }
    Ok(())
}

/// Removes emoji (and the joiners/selectors that glue them) and trims the result.
///
/// Button labels carry an emoji prefix ("🔙 Main Menu"); routing works on the bare text.
pub fn strip_emoji(text: &str) -> String {
    text.chars()
        .filter(|c| !is_emoji(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF     // pictographs, emoticons, transport, flags, supplemental symbols
            | 0x2190..=0x21FF // arrows (↖)
            | 0x2300..=0x23FF // misc technical (⌛)
            | 0x2460..=0x24FF // enclosed alphanumerics
            | 0x25A0..=0x25FF // geometric shapes
            | 0x2600..=0x27BF // misc symbols, dingbats (⚙ ❌ ➕)
            | 0x2900..=0x297F // supplemental arrows
            | 0x2B00..=0x2BFF // misc symbols and arrows
            | 0x3030 | 0x303D | 0x3297 | 0x3299
            | 0x200D          // zero width joiner
            | 0x20E3          // combining keycap
            | 0xFE00..=0xFE0F // variation selectors
            | 0xE0020..=0xE007F // tags
    )
}
