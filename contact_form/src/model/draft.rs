//! Draft persistence for the contact form.
//!
//! - `DraftStore` reads and writes the form as JSON under [`DRAFT_KEY`] in any
//!   `KeyValueStore`. A missing or unreadable draft loads as an empty form.
//! - `DraftAutosaver` debounces writes: it keeps only the newest snapshot and writes it
//!   once no newer snapshot arrived for the debounce delay. Dropping the autosaver
//!   writes a still-pending snapshot before its thread exits.

use broker_common::BrokerError;
use broker_common::storage::KeyValueStore;
use crossbeam_channel::{RecvTimeoutError, Sender, bounded, unbounded};
use log::{debug, error, warn};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::model::form::ContactForm;

/// Storage key of the saved draft.
pub const DRAFT_KEY: &str = "anand_contact_draft";
/// Quiet period before a draft is written.
pub const DRAFT_DEBOUNCE: Duration = Duration::from_millis(600);

/// A draft store shared between the session and its autosaver.
pub type SharedDraft<S> = Arc<Mutex<DraftStore<S>>>;

/// Reads and writes the contact form draft.
pub struct DraftStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> DraftStore<S> {
    /// Wrap a key/value store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Wrap into the shared form used by sessions and autosavers.
    pub fn shared(store: S) -> SharedDraft<S> {
        Arc::new(Mutex::new(Self::new(store)))
    }

    /// Saved draft, or an empty form when nothing usable is stored.
    pub fn load(&self) -> ContactForm {
        match self.store.get(DRAFT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<ContactForm>(&raw) {
                Ok(form) => form,
                Err(e) => {
                    warn!("Ignoring unreadable draft: {}", e);
                    ContactForm::default()
                }
            },
            Ok(None) => ContactForm::default(),
            Err(e) => {
                warn!("Could not read draft: {}", e);
                ContactForm::default()
            }
        }
    }

    /// Persist `form` as the draft.
    pub fn save(&mut self, form: &ContactForm) -> Result<(), BrokerError> {
        let json = serde_json::to_string(form)?;
        self.store.set(DRAFT_KEY, &json)?;
        debug!("Draft saved ({} bytes)", json.len());
        Ok(())
    }

    /// Remove the draft.
    pub fn clear(&mut self) -> Result<(), BrokerError> {
        self.store.remove(DRAFT_KEY)
    }

    /// Whether a draft entry exists (readable or not).
    pub fn has_draft(&self) -> Result<bool, BrokerError> {
        Ok(self.store.get(DRAFT_KEY)?.is_some())
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Underlying store, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

enum AutosaveMsg {
    Update(ContactForm),
    Cancel(Sender<()>),
}

/// Background debounced writer for a [`SharedDraft`].
pub struct DraftAutosaver {
    tx: Option<Sender<AutosaveMsg>>,
    handle: Option<JoinHandle<()>>,
}

impl DraftAutosaver {
    /// Start an autosaver writing into `draft` after `delay` of inactivity.
    pub fn spawn<S>(draft: SharedDraft<S>, delay: Duration) -> Result<Self, BrokerError>
    where
        S: KeyValueStore + Send + 'static,
    {
        let (tx, rx) = unbounded::<AutosaveMsg>();

        let handle = thread::Builder::new()
            .name("draft-autosave".to_string())
            .spawn(move || {
                let mut pending: Option<ContactForm> = None;
                loop {
                    let msg = if pending.is_some() {
                        rx.recv_timeout(delay)
                    } else {
                        rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
                    };
                    match msg {
                        Ok(AutosaveMsg::Update(form)) => pending = Some(form),
                        Ok(AutosaveMsg::Cancel(ack)) => {
                            pending = None;
                            let _ = ack.send(());
                        }
                        Err(RecvTimeoutError::Timeout) => write_pending(&draft, &mut pending),
                        Err(RecvTimeoutError::Disconnected) => {
                            write_pending(&draft, &mut pending);
                            break;
                        }
                    }
                }
                debug!("Draft autosaver stopped");
            })?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue `form` to be written once edits pause.
    pub fn schedule(&self, form: ContactForm) -> Result<(), BrokerError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| BrokerError::ChannelSend("autosaver stopped".to_string()))?;
        tx.send(AutosaveMsg::Update(form))
            .map_err(|e| BrokerError::ChannelSend(e.to_string()))
    }

    /// Discard any pending snapshot. Returns once the writer has acknowledged, so a
    /// write that was already due has completed.
    pub fn cancel_pending(&self) -> Result<(), BrokerError> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| BrokerError::ChannelSend("autosaver stopped".to_string()))?;
        let (ack_tx, ack_rx) = bounded::<()>(1);
        tx.send(AutosaveMsg::Cancel(ack_tx))
            .map_err(|e| BrokerError::ChannelSend(e.to_string()))?;
        ack_rx
            .recv()
            .map_err(|e| BrokerError::ChannelRecv(e.to_string()))
    }
}

impl Drop for DraftAutosaver {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Draft autosaver panicked");
            }
        }
    }
}

fn write_pending<S: KeyValueStore>(draft: &SharedDraft<S>, pending: &mut Option<ContactForm>) {
    let Some(form) = pending.take() else {
        return;
    };
    match draft.lock() {
        Ok(mut store) => {
            if let Err(e) = store.save(&form) {
                error!("Failed to autosave draft: {}", e);
            }
        }
        Err(e) => error!("Draft store unavailable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::Field;
    use broker_common::storage::MemoryStore;

    fn sample() -> ContactForm {
        let mut form = ContactForm::default();
        form.set(Field::Name, "Test");
        form.set(Field::Email, "test@example.com");
        form.set(Field::Budget, "Not Sure");
        form
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut drafts = DraftStore::new(MemoryStore::new());
        assert_eq!(drafts.load(), ContactForm::default());
        assert!(!drafts.has_draft().unwrap());

        drafts.save(&sample()).unwrap();
        assert_eq!(drafts.load(), sample());

        drafts.clear().unwrap();
        assert!(!drafts.has_draft().unwrap());
        assert_eq!(drafts.load(), ContactForm::default());
    }

    #[test]
    fn corrupted_draft_falls_back_to_empty_form() {
        let mut drafts = DraftStore::new(MemoryStore::new());
        for raw in ["{not json", "[]", "null", "42"] {
            drafts.store_mut().set(DRAFT_KEY, raw).unwrap();
            assert!(drafts.has_draft().unwrap());
            assert_eq!(drafts.load(), ContactForm::default(), "{}", raw);
        }
    }

    #[test]
    fn autosaver_writes_only_latest_after_pause() {
        let draft = DraftStore::shared(MemoryStore::new());
        let saver = DraftAutosaver::spawn(Arc::clone(&draft), Duration::from_millis(40)).unwrap();

        let mut form = ContactForm::default();
        for ch in ["T", "Te", "Tes", "Test"] {
            form.set(Field::Name, ch);
            saver.schedule(form.clone()).unwrap();
        }
        assert!(!draft.lock().unwrap().has_draft().unwrap());

        thread::sleep(Duration::from_millis(200));
        assert_eq!(draft.lock().unwrap().load().name, "Test");
        drop(saver);
    }

    #[test]
    fn cancel_pending_discards_snapshot() {
        let draft = DraftStore::shared(MemoryStore::new());
        let saver = DraftAutosaver::spawn(Arc::clone(&draft), Duration::from_millis(40)).unwrap();

        saver.schedule(sample()).unwrap();
        saver.cancel_pending().unwrap();
        thread::sleep(Duration::from_millis(120));
        assert!(!draft.lock().unwrap().has_draft().unwrap());
    }

    #[test]
    fn drop_flushes_pending_snapshot() {
        let draft = DraftStore::shared(MemoryStore::new());
        {
            let saver = DraftAutosaver::spawn(Arc::clone(&draft), Duration::from_secs(60)).unwrap();
            saver.schedule(sample()).unwrap();
        }
        assert_eq!(draft.lock().unwrap().load(), sample());
    }
}
