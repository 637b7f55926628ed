use crate::events::AppEvent;
use async_channel::Sender;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use shinobi::store::Store;

/// Forwards changes to the store's files, including those made by other
/// processes such as the `shinobi` CLI.
pub async fn run_async_watcher(tx: Sender<AppEvent>, store: Store) {
    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(store.dir(), RecursiveMode::NonRecursive) {
        log::error!("Failed to watch data directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if !meaningful_event {
                    continue;
                }
                if let Some(path) = event.paths.into_iter().find(|p| store.owns(p))
                    && tx.send(AppEvent::DataChanged(path)).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
