//! Client-side validation of the contact form.

use clap::ValueEnum;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::model::form::{ContactForm, Field};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ]{7,15}$").expect("phone pattern compiles"));

/// Minimum trimmed message length.
pub const MIN_MESSAGE_CHARS: usize = 10;

/// Which variant of the form is being validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum FormKind {
    /// Name, email, phone, subject and message.
    Quick,
    /// Quick fields plus property type, budget and timeline selections.
    Detailed,
}

impl FormKind {
    /// Whether the select fields must be filled for this kind.
    pub fn requires_selections(&self) -> bool {
        matches!(self, FormKind::Detailed)
    }
}

/// Field-level error messages, ordered by [`Field`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, String>,
}

impl FieldErrors {
    /// No errors recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with an error.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for `field`, if it is invalid.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// First invalid field in display order; the one to focus.
    pub fn first(&self) -> Option<Field> {
        self.errors.keys().next().copied()
    }

    /// Drop the error for `field` (the visitor edited it).
    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    /// Errors in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.errors.insert(field, message.to_string());
    }
}

/// Validate `form` for `kind`, returning every field error at once.
pub fn validate(form: &ContactForm, kind: FormKind) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if form.name.trim().is_empty() {
        errors.insert(Field::Name, "Name is required");
    }

    if form.email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !EMAIL_RE.is_match(&form.email) {
        errors.insert(Field::Email, "Enter a valid email");
    }

    if form.phone.trim().is_empty() {
        errors.insert(Field::Phone, "Phone is required");
    } else if !PHONE_RE.is_match(&form.phone) {
        errors.insert(Field::Phone, "Enter a valid phone number");
    }

    if kind.requires_selections() {
        if form.property_type.is_empty() {
            errors.insert(Field::PropertyType, "Please select property type");
        }
        if form.budget.is_empty() {
            errors.insert(Field::Budget, "Please select budget range");
        }
        if form.timeline.is_empty() {
            errors.insert(Field::Timeline, "Please select timeline");
        }
    }

    if form.subject.trim().is_empty() {
        errors.insert(Field::Subject, "Subject is required");
    }

    if form.message.trim().chars().count() < MIN_MESSAGE_CHARS {
        errors.insert(
            Field::Message,
            "Please provide a helpful message (min 10 chars)",
        );
    }

    if !form.website.trim().is_empty() {
        errors.insert(Field::Website, "Spam detected");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_quick() -> ContactForm {
        ContactForm {
            name: "Test".into(),
            email: "test@example.com".into(),
            phone: "+919876543210".into(),
            subject: "Hi".into(),
            message: "This is a test message.".into(),
            ..ContactForm::default()
        }
    }

    fn valid_detailed() -> ContactForm {
        ContactForm {
            property_type: "Luxury Villa".into(),
            budget: "Not Sure".into(),
            timeline: "Immediately".into(),
            ..valid_quick()
        }
    }

    #[test]
    fn valid_forms_pass() {
        assert!(validate(&valid_quick(), FormKind::Quick).is_empty());
        assert!(validate(&valid_detailed(), FormKind::Detailed).is_empty());
    }

    #[test]
    fn quick_form_does_not_need_selections() {
        let errors = validate(&valid_quick(), FormKind::Detailed);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.first(), Some(Field::PropertyType));
        assert!(validate(&valid_quick(), FormKind::Quick).is_empty());
    }

    #[test]
    fn every_empty_required_field_blocks() {
        let cases = [
            (Field::Name, "Name is required"),
            (Field::Email, "Email is required"),
            (Field::Phone, "Phone is required"),
            (Field::PropertyType, "Please select property type"),
            (Field::Budget, "Please select budget range"),
            (Field::Timeline, "Please select timeline"),
            (Field::Subject, "Subject is required"),
            (Field::Message, "Please provide a helpful message (min 10 chars)"),
        ];
        for (field, message) in cases {
            let mut form = valid_detailed();
            form.set(field, "");
            let errors = validate(&form, FormKind::Detailed);
            assert_eq!(errors.len(), 1, "{}", field);
            assert_eq!(errors.get(field), Some(message));
            assert_eq!(errors.first(), Some(field));
        }
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let mut form = valid_quick();
        form.name = "   ".into();
        form.subject = "\t".into();
        let errors = validate(&form, FormKind::Quick);
        assert_eq!(errors.get(Field::Name), Some("Name is required"));
        assert_eq!(errors.get(Field::Subject), Some("Subject is required"));
    }

    #[test]
    fn malformed_email_and_phone() {
        let mut form = valid_quick();
        form.email = "not-an-email".into();
        form.phone = "12-34".into();
        let errors = validate(&form, FormKind::Quick);
        assert_eq!(errors.get(Field::Email), Some("Enter a valid email"));
        assert_eq!(errors.get(Field::Phone), Some("Enter a valid phone number"));
        assert_eq!(errors.first(), Some(Field::Email));

        for bad in ["a@b", "a b@c.d", "@c.d"] {
            form.email = bad.into();
            assert!(validate(&form, FormKind::Quick).get(Field::Email).is_some(), "{}", bad);
        }
        for (phone, ok) in [
            ("98765 43210", true),
            ("1234567", true),
            ("123456", false),
            ("+1234567890123456", false),
            ("++1234567", false),
        ] {
            form.phone = phone.into();
            assert_eq!(validate(&form, FormKind::Quick).get(Field::Phone).is_none(), ok, "{}", phone);
        }
    }

    #[test]
    fn short_message_is_rejected_after_trim() {
        let mut form = valid_quick();
        form.message = "   long enough   ".into();
        assert!(validate(&form, FormKind::Quick).get(Field::Message).is_none());
        form.message = "  short   ".into();
        assert!(validate(&form, FormKind::Quick).get(Field::Message).is_some());
    }

    #[test]
    fn honeypot_flags_spam_even_when_valid() {
        let mut form = valid_detailed();
        form.website = "http://spam.example".into();
        let errors = validate(&form, FormKind::Detailed);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Website), Some("Spam detected"));

        let mut empty = ContactForm::default();
        empty.website = "x".into();
        assert_eq!(validate(&empty, FormKind::Quick).get(Field::Website), Some("Spam detected"));
    }

    #[test]
    fn clearing_a_field_error() {
        let mut errors = validate(&ContactForm::default(), FormKind::Quick);
        assert_eq!(errors.first(), Some(Field::Name));
        errors.clear(Field::Name);
        assert_eq!(errors.first(), Some(Field::Email));
        assert_eq!(errors.iter().count(), 4);
    }
}
