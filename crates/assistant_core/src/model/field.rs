//! Validated value fields for contact records.
//!
//! # Responsibility
//! - Normalize raw user input into canonical field values.
//! - Define equality between a field and raw external strings.
//!
//! # Invariants
//! - Display output and equality are derived from the normalized value only.
//! - `Phone` holds 8..=15 ASCII digits.
//! - `Email` is lowercase and matches `EMAIL_RE`.
//! - Deserialization runs the same validation as construction.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PHONE_MIN_DIGITS: usize = 8;
const PHONE_MAX_DIGITS: usize = 15;
const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Validation error raised while constructing one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Carries the cleaned digit string.
    PhoneFormat(String),
    /// Carries the trimmed lowercase candidate.
    EmailFormat(String),
    /// Carries the trimmed raw input.
    BirthdayFormat(String),
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PhoneFormat(digits) => write!(f, "Wrong phone number format '{digits}'."),
            Self::EmailFormat(value) => write!(f, "Wrong email format '{value}'."),
            Self::BirthdayFormat(value) => {
                write!(f, "Invalid date format '{value}'. Use DD.MM.YYYY")
            }
        }
    }
}

impl Error for FieldError {}

/// Returns the lookup key for a contact name.
pub fn normalize_name_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Contact display name: trimmed, every word capitalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Self {
        Self(title_case(value.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Store key derived from this name.
    pub fn key(&self) -> String {
        normalize_name_key(&self.0)
    }
}

fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut word_start = true;
    for ch in value.chars() {
        if ch.is_whitespace() {
            word_start = true;
            result.push(ch);
        } else if word_start {
            result.extend(ch.to_uppercase());
            word_start = false;
        } else {
            result.extend(ch.to_lowercase());
        }
    }
    result
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.key() == normalize_name_key(other)
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<Name> for String {
    fn from(value: Name) -> Self {
        value.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// International phone number kept as bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Strips every non-digit character and validates the digit count.
    ///
    /// # Errors
    /// - `FieldError::PhoneFormat` when fewer than 8 or more than 15 digits remain.
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        let digits = clean_phone(value);
        if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
            return Err(FieldError::PhoneFormat(digits));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn clean_phone(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}

impl PartialEq<str> for Phone {
    fn eq(&self, other: &str) -> bool {
        self.0 == clean_phone(other)
    }
}

impl PartialEq<&str> for Phone {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<u64> for Phone {
    fn eq(&self, other: &u64) -> bool {
        self.0 == other.to_string()
    }
}

impl FromStr for Phone {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(value: Phone) -> Self {
        value.0
    }
}

impl Display for Phone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address, trimmed and case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// # Errors
    /// - `FieldError::EmailFormat` when the value is not `local@domain.tld`.
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        let email = value.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(FieldError::EmailFormat(email));
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Email {
    fn eq(&self, other: &str) -> bool {
        matches!(Self::parse(other), Ok(candidate) if candidate == *self)
    }
}

impl PartialEq<&str> for Email {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl FromStr for Email {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar birth date, written as `DD.MM.YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parses `DD.MM.YYYY`; whitespace anywhere in the input is ignored.
    ///
    /// # Errors
    /// - `FieldError::BirthdayFormat` when the text is not a valid date.
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        let compact: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
        NaiveDate::parse_from_str(&compact, BIRTHDAY_FORMAT)
            .map(Self)
            .map_err(|_| FieldError::BirthdayFormat(value.trim().to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Projects the anniversary onto `year`.
    ///
    /// 29 February falls back to 28 February in non-leap years. Returns `None`
    /// only when `year` is outside the supported calendar range.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        self.0
            .with_year(year)
            .or_else(|| NaiveDate::from_ymd_opt(year, self.0.month(), 28))
    }
}

impl From<NaiveDate> for Birthday {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for Birthday {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Birthday {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> Self {
        value.to_string()
    }
}

impl Display for Birthday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

/// Free-form postal address. Not parsed into parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Address, Birthday, Email, FieldError, Name, Phone};
    use chrono::NaiveDate;

    #[test]
    fn name_is_trimmed_and_title_cased() {
        let name = Name::new("  john SMITH ");
        assert_eq!(name.as_str(), "John Smith");
        assert_eq!(name.key(), "john smith");
    }

    #[test]
    fn name_equality_ignores_case_and_padding() {
        let name = Name::new("John");
        assert!(name == "  JOHN ");
        assert!(name != "Johnny");
    }

    #[test]
    fn phone_keeps_digits_only() {
        let phone = Phone::parse("+1 (234) 567-89-10").unwrap();
        assert_eq!(phone.as_str(), "12345678910");
    }

    #[test]
    fn phone_accepts_every_length_in_range() {
        for len in 8..=15 {
            let raw = "7".repeat(len);
            let phone = Phone::parse(&raw).unwrap();
            assert!(phone == raw.as_str());
            assert_eq!(phone, Phone::parse(&raw).unwrap());
        }
    }

    #[test]
    fn phone_rejects_out_of_range_lengths_with_cleaned_digits() {
        assert_eq!(
            Phone::parse("1").unwrap_err(),
            FieldError::PhoneFormat("1".to_string())
        );
        let err = Phone::parse("+1 2345").unwrap_err();
        assert_eq!(err.to_string(), "Wrong phone number format '12345'.");
        assert!(Phone::parse(&"9".repeat(16)).is_err());
    }

    #[test]
    fn phone_compares_against_formatted_text_and_integers() {
        let phone = Phone::parse("0501234567").unwrap();
        assert!(phone == "050-123-45-67");
        assert!(Phone::parse("380501234567").unwrap() == 380_501_234_567_u64);
        assert!(phone != "not a phone");
    }

    #[test]
    fn email_is_normalized_and_validated() {
        let email = Email::parse("  Test@Test.COM ").unwrap();
        assert_eq!(email.as_str(), "test@test.com");
        assert!(Email::parse("test").is_err());
        assert!(Email::parse("a@@b.com").is_err());
        assert!(Email::parse("a b@c.com").is_err());
        assert!(Email::parse("a@nodot").is_err());
    }

    #[test]
    fn email_equality_is_case_insensitive_and_never_fails() {
        let email = Email::parse("A@B.com").unwrap();
        assert!(email == "a@b.com");
        assert!(email != "broken");
    }

    #[test]
    fn birthday_roundtrips_display_format() {
        let birthday = Birthday::parse(" 05. 03.1990 ").unwrap();
        assert_eq!(birthday.date(), NaiveDate::from_ymd_opt(1990, 3, 5).unwrap());
        assert_eq!(birthday.to_string(), "05.03.1990");
    }

    #[test]
    fn birthday_rejects_other_formats() {
        let err = Birthday::parse("1990-03-05").unwrap_err();
        assert!(matches!(err, FieldError::BirthdayFormat(_)));
        assert!(Birthday::parse("31.02.2020").is_err());
    }

    #[test]
    fn leap_day_projects_to_feb_28_in_common_years() {
        let birthday = Birthday::parse("29.02.2024").unwrap();
        assert_eq!(
            birthday.in_year(2025),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
        assert_eq!(
            birthday.in_year(2028),
            NaiveDate::from_ymd_opt(2028, 2, 29)
        );
    }

    #[test]
    fn address_is_trimmed() {
        assert_eq!(Address::new("  Kyiv, Main st. 1 ").as_str(), "Kyiv, Main st. 1");
    }
}
