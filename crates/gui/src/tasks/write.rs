#![forbid(unsafe_code)]

use ntdash_api::PendingWrite;
use tracing::{info, warn};

use crate::{NtDashApp, UiUpdate};

impl NtDashApp {
    /// Hand a validated write to the blocking pool; the outcome comes back as
    /// a `UiUpdate`. Without a runtime (tests, embedding) it is sent inline.
    pub(crate) fn start_write_task(&mut self, pending: PendingWrite) {
        let tx = self.updates_tx.clone();
        let client = self.bridge.client();
        self.write.in_flight += 1;
        let job = move || {
            let (path, kind, raw) = (pending.path.clone(), pending.kind, pending.raw.clone());
            let update = match pending.send(client.as_ref()) {
                Ok(()) => UiUpdate::WriteDone { path, kind, raw },
                Err(error) => {
                    warn!(path = %path, error = %error, "write: failed");
                    UiUpdate::WriteFailed { path, error }
                }
            };
            let _ = tx.send(update);
        };
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn_blocking(job);
            }
            Err(_) => {
                info!("write: no runtime, sending inline");
                job();
            }
        }
    }
}
