//! Owned handle for a repeating background job.
//!
//! `PeriodicTask::spawn` starts a named thread that runs a callback every `interval`,
//! driven by `crossbeam_channel::tick`. The task lives exactly as long as its handle:
//! `cancel()` or dropping the handle signals the thread and joins it, so once either
//! returns the callback will not run again.

use broker_common::BrokerError;
use crossbeam_channel::{Sender, TryRecvError, bounded, select, tick};
use log::{debug, error};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a running periodic job.
pub struct PeriodicTask {
    name: String,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Run `job` every `interval` on a dedicated thread until it returns `false`
    /// or the handle is cancelled/dropped. The first run happens after one interval.
    pub fn spawn<F>(name: &str, interval: Duration, mut job: F) -> Result<Self, BrokerError>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let ticker = tick(interval);
        let thread_name = name.to_string();

        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            // A stop may race with a tick; stop wins.
                            if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                                break;
                            }
                            if !job() {
                                break;
                            }
                        }
                    }
                }
                debug!("Periodic task {} stopped", thread_name);
            })?;

        debug!("Periodic task {} started every {:?}", name, interval);
        Ok(Self {
            name: name.to_string(),
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Task name, also used as the thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the job thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Stop the job and wait for its thread to exit.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender disconnects `stop_rx`, which wakes the select.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                error!("Periodic task {} panicked", self.name);
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
