use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Builder;

/// Control socket and config watcher, on a single-threaded tokio runtime
/// off the GTK main loop.
pub fn start_background_services(tx: Sender<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("budgetring-services".to_string())
        .spawn(move || {
            let rt = match Builder::new_current_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime, control socket disabled: {}", e);
                    return;
                }
            };

            rt.block_on(async move {
                tokio::join!(
                    crate::sys::server::run_server(tx.clone()),
                    crate::config::run_async_watcher(tx),
                );
            });
        });

    if let Err(e) = spawned {
        log::error!("Failed to start background services: {}", e);
    }
}
