//! Contact submission state machine.
//!
//! ```text
//! Idle --submit--> Validating --invalid--> Idle (errors set, first field to focus)
//!                  Validating --valid----> Submitting --ok----> Success
//!                                          Submitting --fail--> Error
//! Success | Error --acknowledge--> Idle
//! Success --reset delay elapsed--> Idle
//! ```
//!
//! A failure while clearing the draft after an accepted submission also lands in
//! `Error`, so the session can always be acknowledged and used again.
//!
//! There is no real backend. `SimulatedTransport` waits for a fixed delay and can be
//! told to fail a share of submissions, which makes the `Error` state reachable.

use broker_common::BrokerError;
use broker_common::storage::KeyValueStore;
use crossbeam_channel::{Receiver, after};
use log::{debug, info, warn};
use rand::Rng;
use std::thread;
use std::time::{Duration, Instant};
use strum_macros::Display;

use crate::model::draft::{DraftAutosaver, SharedDraft};
use crate::model::form::{ContactForm, Field};
use crate::model::validation::{FieldErrors, FormKind, validate};

/// Default simulated network latency.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1200);
/// How long a success result stays up before the session returns to `Idle`.
pub const SUCCESS_RESET: Duration = Duration::from_millis(5000);

/// Where the session is in the submit flow.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SubmitState {
    /// Editing; ready to submit.
    Idle,
    /// Running validation.
    Validating,
    /// Waiting on the transport.
    Submitting,
    /// Last submission was accepted.
    Success,
    /// Last submission failed with the given reason.
    Error(String),
}

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted; draft cleared and form reset.
    Sent,
    /// Blocked by validation; `focus` is the first invalid field.
    Invalid {
        /// Field to focus.
        focus: Field,
    },
    /// Transport rejected the submission.
    Failed(String),
}

/// Delivers a validated form.
pub trait SubmitTransport {
    /// Send `form`; an `Err` moves the session to `SubmitState::Error`.
    fn submit(&self, form: &ContactForm) -> Result<(), BrokerError>;
}

/// Stand-in backend: sleeps for `delay`, then fails with probability `failure_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    /// Simulated latency.
    pub delay: Duration,
    /// Share of submissions that fail, `0.0..=1.0`.
    pub failure_rate: f64,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self {
            delay: DEFAULT_SUBMIT_DELAY,
            failure_rate: 0.0,
        }
    }
}

impl SubmitTransport for SimulatedTransport {
    fn submit(&self, form: &ContactForm) -> Result<(), BrokerError> {
        info!("Submitting inquiry from {} <{}>", form.name.trim(), form.email);
        thread::sleep(self.delay);

        let rate = if self.failure_rate.is_finite() {
            self.failure_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if rate > 0.0 && rand::rng().random_bool(rate) {
            return Err(BrokerError::Submission(
                "simulated network failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// One visitor's contact form: current values, field errors, submit state and draft.
pub struct ContactSession<S: KeyValueStore> {
    form: ContactForm,
    errors: FieldErrors,
    state: SubmitState,
    kind: FormKind,
    draft: SharedDraft<S>,
    autosaver: Option<DraftAutosaver>,
    success_reset: Option<Duration>,
    reset_timer: Option<Receiver<Instant>>,
}

impl<S: KeyValueStore + Send + 'static> ContactSession<S> {
    /// Open a session, restoring any saved draft.
    pub fn open(kind: FormKind, draft: SharedDraft<S>) -> Result<Self, BrokerError> {
        let form = draft.lock()?.load();
        Ok(Self {
            form,
            errors: FieldErrors::default(),
            state: SubmitState::Idle,
            kind,
            draft,
            autosaver: None,
            success_reset: None,
            reset_timer: None,
        })
    }

    /// Return from `Success` to `Idle` on its own once `delay` has passed.
    pub fn with_success_reset(mut self, delay: Duration) -> Self {
        self.success_reset = Some(delay);
        self
    }

    /// Save edits in the background once they pause for `delay`.
    pub fn with_autosave(mut self, delay: Duration) -> Result<Self, BrokerError> {
        let saver = DraftAutosaver::spawn(std::sync::Arc::clone(&self.draft), delay)?;
        self.autosaver = Some(saver);
        Ok(self)
    }

    /// Current form values.
    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    /// Errors from the last failed validation, minus fields edited since.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Current state.
    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Current state after applying an elapsed success reset.
    pub fn poll_state(&mut self) -> &SubmitState {
        let expired = self
            .reset_timer
            .as_ref()
            .is_some_and(|timer| timer.try_recv().is_ok());
        if expired {
            debug!("Success status expired");
            self.reset_timer = None;
            if self.state == SubmitState::Success {
                self.state = SubmitState::Idle;
            }
        }
        &self.state
    }

    /// Form variant being validated.
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Edit one field. Clears that field's error and schedules an autosave.
    pub fn update_field(&mut self, field: Field, value: &str) -> Result<(), BrokerError> {
        self.form.set(field, value);
        self.errors.clear(field);
        if let Some(saver) = &self.autosaver {
            saver.schedule(self.form.clone())?;
        }
        Ok(())
    }

    /// Write the current form to the draft store immediately.
    pub fn save_draft(&self) -> Result<(), BrokerError> {
        self.draft.lock()?.save(&self.form)
    }

    /// Drop the draft and start over with an empty form.
    pub fn discard_draft(&mut self) -> Result<(), BrokerError> {
        if let Some(saver) = &self.autosaver {
            saver.cancel_pending()?;
        }
        self.draft.lock()?.clear()?;
        self.form = ContactForm::default();
        self.errors = FieldErrors::default();
        Ok(())
    }

    /// Whether a draft is currently stored.
    pub fn has_saved_draft(&self) -> Result<bool, BrokerError> {
        self.draft.lock()?.has_draft()
    }

    /// Run validation and, if it passes, hand the form to `transport`.
    ///
    /// Only allowed from `Idle`; acknowledge a previous result first.
    pub fn submit(&mut self, transport: &dyn SubmitTransport) -> Result<SubmitOutcome, BrokerError> {
        if *self.poll_state() != SubmitState::Idle {
            return Err(BrokerError::Format(format!(
                "cannot submit while {}",
                self.state
            )));
        }

        self.state = SubmitState::Validating;
        let errors = validate(&self.form, self.kind);
        if let Some(focus) = errors.first() {
            warn!("Submission blocked: {} invalid field(s), first {}", errors.len(), focus);
            self.errors = errors;
            self.state = SubmitState::Idle;
            return Ok(SubmitOutcome::Invalid { focus });
        }
        self.errors = errors;

        self.state = SubmitState::Submitting;
        match transport.submit(&self.form) {
            Ok(()) => {
                if let Err(e) = self.forget_draft() {
                    warn!("Inquiry sent but the draft could not be cleared: {}", e);
                    self.state = SubmitState::Error(e.to_string());
                    return Err(e);
                }
                self.form = ContactForm::default();
                self.state = SubmitState::Success;
                self.reset_timer = self.success_reset.map(after);
                info!("Inquiry sent; draft cleared");
                Ok(SubmitOutcome::Sent)
            }
            Err(e) => {
                let reason = e.to_string();
                warn!("Inquiry failed: {}", reason);
                self.state = SubmitState::Error(reason.clone());
                Ok(SubmitOutcome::Failed(reason))
            }
        }
    }

    /// Dismiss a success or error result and return to `Idle`.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, SubmitState::Success | SubmitState::Error(_)) {
            self.state = SubmitState::Idle;
            self.reset_timer = None;
        }
    }

    fn forget_draft(&self) -> Result<(), BrokerError> {
        if let Some(saver) = &self.autosaver {
            saver.cancel_pending()?;
        }
        self.draft.lock()?.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::draft::{DRAFT_KEY, DraftStore};
    use broker_common::storage::MemoryStore;
    use std::sync::Arc;
    use std::time::Instant;

    fn instant() -> SimulatedTransport {
        SimulatedTransport {
            delay: Duration::ZERO,
            ..SimulatedTransport::default()
        }
    }

    /// Store whose deletes always fail.
    #[derive(Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, BrokerError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), BrokerError> {
            self.inner.set(key, value)
        }

        fn remove(&mut self, _key: &str) -> Result<(), BrokerError> {
            Err(BrokerError::Io(std::io::Error::other("disk gone")))
        }
    }

    fn fill_quick(session: &mut ContactSession<MemoryStore>) {
        session.update_field(Field::Name, "Test").unwrap();
        session.update_field(Field::Email, "test@example.com").unwrap();
        session.update_field(Field::Phone, "+919876543210").unwrap();
        session.update_field(Field::Subject, "Hi").unwrap();
        session.update_field(Field::Message, "This is a test message.").unwrap();
    }

    #[test]
    fn successful_submission_clears_draft_and_resets() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, Arc::clone(&draft)).unwrap();
        fill_quick(&mut session);
        session.save_draft().unwrap();
        assert!(draft.lock().unwrap().store().contains(DRAFT_KEY));

        let transport = SimulatedTransport {
            delay: Duration::from_millis(30),
            failure_rate: 0.0,
        };
        let started = Instant::now();
        let outcome = session.submit(&transport).unwrap();

        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(session.state(), &SubmitState::Success);
        assert_eq!(session.state().to_string(), "success");
        assert!(!draft.lock().unwrap().store().contains(DRAFT_KEY));
        assert_eq!(session.form(), &ContactForm::default());
        assert!(session.errors().is_empty());
    }

    #[test]
    fn invalid_submission_returns_to_idle_with_focus() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, draft).unwrap();
        fill_quick(&mut session);
        session.update_field(Field::Email, "not-an-email").unwrap();

        let outcome = session.submit(&instant()).unwrap();
        assert_eq!(outcome, SubmitOutcome::Invalid { focus: Field::Email });
        assert_eq!(session.state(), &SubmitState::Idle);
        assert_eq!(session.errors().get(Field::Email), Some("Enter a valid email"));

        session.update_field(Field::Email, "test@example.com").unwrap();
        assert!(session.errors().get(Field::Email).is_none());
        assert_eq!(session.submit(&instant()).unwrap(), SubmitOutcome::Sent);
    }

    #[test]
    fn honeypot_blocks_submission() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, draft).unwrap();
        fill_quick(&mut session);
        session.update_field(Field::Website, "bot.example").unwrap();

        let outcome = session.submit(&instant()).unwrap();
        assert_eq!(outcome, SubmitOutcome::Invalid { focus: Field::Website });
        assert_eq!(session.errors().get(Field::Website), Some("Spam detected"));
    }

    #[test]
    fn failed_transport_keeps_form_and_draft() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, Arc::clone(&draft)).unwrap();
        fill_quick(&mut session);
        session.save_draft().unwrap();

        let always_fail = SimulatedTransport {
            delay: Duration::ZERO,
            failure_rate: 1.0,
        };
        let outcome = session.submit(&always_fail).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(ref m) if m.contains("simulated")));
        assert!(matches!(session.state(), SubmitState::Error(_)));
        assert_eq!(session.form().name, "Test");
        assert!(draft.lock().unwrap().store().contains(DRAFT_KEY));

        assert!(session.submit(&instant()).is_err());
        session.acknowledge();
        assert_eq!(session.state(), &SubmitState::Idle);
        assert_eq!(session.submit(&instant()).unwrap(), SubmitOutcome::Sent);
    }

    #[test]
    fn draft_cleanup_failure_moves_to_error_and_recovers() {
        let draft = DraftStore::shared(ReadOnlyStore::default());
        let mut session = ContactSession::open(FormKind::Quick, Arc::clone(&draft)).unwrap();
        session.update_field(Field::Name, "Test").unwrap();
        session.update_field(Field::Email, "test@example.com").unwrap();
        session.update_field(Field::Phone, "+919876543210").unwrap();
        session.update_field(Field::Subject, "Hi").unwrap();
        session.update_field(Field::Message, "This is a test message.").unwrap();
        session.save_draft().unwrap();

        let err = session.submit(&instant()).unwrap_err();
        assert!(matches!(err, BrokerError::Io(_)));
        assert!(matches!(session.state(), SubmitState::Error(m) if m.contains("disk gone")));
        assert_eq!(session.form().name, "Test");

        session.acknowledge();
        assert_eq!(session.state(), &SubmitState::Idle);
        assert!(session.submit(&instant()).is_err());
        assert!(matches!(session.state(), SubmitState::Error(_)));
    }

    #[test]
    fn success_resets_to_idle_after_delay() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, draft)
            .unwrap()
            .with_success_reset(Duration::from_millis(40));
        fill_quick(&mut session);

        assert_eq!(session.submit(&instant()).unwrap(), SubmitOutcome::Sent);
        assert_eq!(session.poll_state(), &SubmitState::Success);
        assert!(session.submit(&instant()).is_err());

        thread::sleep(Duration::from_millis(120));
        assert_eq!(session.poll_state(), &SubmitState::Idle);
        fill_quick(&mut session);
        assert_eq!(session.submit(&instant()).unwrap(), SubmitOutcome::Sent);
    }

    #[test]
    fn success_stays_without_reset_delay() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, draft).unwrap();
        fill_quick(&mut session);

        assert_eq!(session.submit(&instant()).unwrap(), SubmitOutcome::Sent);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(session.poll_state(), &SubmitState::Success);
    }

    #[test]
    fn session_restores_saved_draft() {
        let draft = DraftStore::shared(MemoryStore::new());
        {
            let mut session = ContactSession::open(FormKind::Detailed, Arc::clone(&draft)).unwrap();
            session.update_field(Field::PropertyType, "Luxury Villa").unwrap();
            session.save_draft().unwrap();
        }
        let session = ContactSession::open(FormKind::Detailed, draft).unwrap();
        assert_eq!(session.form().property_type, "Luxury Villa");
        assert_eq!(session.kind(), FormKind::Detailed);
    }

    #[test]
    fn pending_autosave_does_not_resurrect_submitted_draft() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, Arc::clone(&draft))
            .unwrap()
            .with_autosave(Duration::from_millis(50))
            .unwrap();
        fill_quick(&mut session);

        assert_eq!(session.submit(&instant()).unwrap(), SubmitOutcome::Sent);
        thread::sleep(Duration::from_millis(150));
        assert!(!draft.lock().unwrap().store().contains(DRAFT_KEY));
    }

    #[test]
    fn discard_draft_resets_everything() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, Arc::clone(&draft)).unwrap();
        fill_quick(&mut session);
        session.save_draft().unwrap();
        assert!(session.has_saved_draft().unwrap());

        session.discard_draft().unwrap();
        assert!(!session.has_saved_draft().unwrap());
        assert!(session.form().is_empty());
    }

    #[test]
    fn autosave_persists_edits() {
        let draft = DraftStore::shared(MemoryStore::new());
        let mut session = ContactSession::open(FormKind::Quick, Arc::clone(&draft))
            .unwrap()
            .with_autosave(Duration::from_millis(20))
            .unwrap();
        session.update_field(Field::Name, "Asha").unwrap();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(draft.lock().unwrap().load().name, "Asha");
    }
}
