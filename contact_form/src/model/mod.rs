//! Domain models for the contact desk.
//!
//! - `form`: field names and the `ContactForm` payload.
//! - `validation`: field rules, honeypot check and ordered `FieldErrors`.
//! - `draft`: draft persistence and the debounced autosaver.
//! - `submission`: the submit state machine and the simulated transport.
pub mod draft;
pub mod form;
pub mod submission;
pub mod validation;
