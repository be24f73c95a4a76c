#![forbid(unsafe_code)]

use ntdash_core::marshal::{self, UpdateQueue, UpdateSender};
use tracing::{debug, info, trace, warn};

use crate::TableClient;

/// Route a client's connection and entry notifications into the UI queue.
///
/// Values are rendered to text here, on the notification thread, so the queue
/// only ever carries display-ready events.
pub fn attach(client: &dyn TableClient, tx: UpdateSender) {
    let conn_tx = tx.clone();
    client.add_connection_listener(
        Box::new(move |connected, info| {
            if !conn_tx.connection(connected, info.to_string()) {
                debug!("listen: ui queue closed, dropping connection event");
            }
        }),
        true,
    );
    client.add_entry_listener(Box::new(move |key, value, is_new| {
        trace!(key = %key, is_new, "listen: entry notification");
        if !tx.entry(key, value.to_string(), is_new) {
            debug!(key = %key, "listen: ui queue closed, dropping entry event");
        }
    }));
}

/// Start the client against `server` and attach it to a fresh UI queue.
///
/// A failed initialization is logged and otherwise ignored: the client stays
/// disconnected and the immediate connection notify still lands first in the
/// queue, so the dashboard starts out showing "Disconnected".
pub fn connect(client: &dyn TableClient, server: &str) -> UpdateQueue {
    match client.initialize(server) {
        Ok(()) => info!(server = %server, "listen: transport initialized"),
        Err(e) => warn!(server = %server, error = %e, "listen: transport init failed; staying disconnected"),
    }
    let (tx, queue) = marshal::channel();
    attach(client, tx);
    queue
}
