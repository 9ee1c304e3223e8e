//! Contact form fields and the draft payload.
//!
//! The form is stored as JSON with camelCase keys (`propertyType`, `website`, ...).
//! Older drafts that used `accountType` for the selection field still load.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Options offered for [`Field::PropertyType`].
pub const PROPERTY_TYPES: &[&str] = &[
    "Residential Apartment",
    "Luxury Villa",
    "Commercial Space",
    "Plot/Land",
    "Investment Property",
    "Rental Property",
    "Vastu Consultation",
    "General Inquiry",
];

/// Options offered for [`Field::Budget`].
pub const BUDGETS: &[&str] = &[
    "Below ₹50 Lakhs",
    "₹50 Lakhs - ₹1 Crore",
    "₹1 Crore - ₹2 Crores",
    "₹2 Crores - ₹5 Crores",
    "Above ₹5 Crores",
    "Not Sure",
];

/// Options offered for [`Field::Timeline`].
pub const TIMELINES: &[&str] = &[
    "Immediately",
    "Within 1 Month",
    "1-3 Months",
    "3-6 Months",
    "6+ Months",
    "Just Exploring",
];

/// Form fields in display order. Errors are reported and focused in this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Field {
    /// Full name.
    Name,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Selected property/account type.
    #[strum(to_string = "propertyType", serialize = "accountType")]
    PropertyType,
    /// Selected budget range.
    Budget,
    /// Selected timeline.
    Timeline,
    /// Subject line.
    Subject,
    /// Free-text message.
    Message,
    /// Hidden honeypot; real users leave it empty.
    Website,
}

impl Field {
    /// Fixed choices for select fields, `None` for free text.
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self {
            Field::PropertyType => Some(PROPERTY_TYPES),
            Field::Budget => Some(BUDGETS),
            Field::Timeline => Some(TIMELINES),
            _ => None,
        }
    }

    /// Fields a visitor can see (everything except the honeypot).
    pub fn visible() -> impl Iterator<Item = Field> {
        Field::iter().filter(|f| *f != Field::Website)
    }
}

/// Contact form contents, persisted as the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactForm {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Selected property/account type.
    #[serde(alias = "accountType")]
    pub property_type: String,
    /// Selected budget range.
    pub budget: String,
    /// Selected timeline.
    pub timeline: String,
    /// Subject line.
    pub subject: String,
    /// Free-text message.
    pub message: String,
    /// Honeypot.
    pub website: String,
}

impl ContactForm {
    /// Current value of `field`.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::PropertyType => &self.property_type,
            Field::Budget => &self.budget,
            Field::Timeline => &self.timeline,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
            Field::Website => &self.website,
        }
    }

    /// Replace the value of `field`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::PropertyType => &mut self.property_type,
            Field::Budget => &mut self.budget,
            Field::Timeline => &mut self.timeline,
            Field::Subject => &mut self.subject,
            Field::Message => &mut self.message,
            Field::Website => &mut self.website,
        };
        *slot = value.into();
    }

    /// True when every field is empty.
    pub fn is_empty(&self) -> bool {
        *self == ContactForm::default()
    }
}
