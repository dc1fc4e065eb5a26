use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::{App, AsyncAction};
use crate::feed::FeedClient;
use crate::updater;

/// Kick off a schedule refresh in the background. The token issued by
/// `begin_refresh` travels with the response so stale results get dropped
/// when refreshes overlap.
pub fn spawn_refresh(app: &mut App, client: &FeedClient, tx: &mpsc::Sender<AsyncAction>) {
    let seq = app.begin_refresh();
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match client.fetch_schedule().await {
            Ok(matches) => {
                let _ = tx.send(AsyncAction::ScheduleLoaded { seq, matches }).await;
            }
            Err(err) => {
                let _ = tx
                    .send(AsyncAction::ScheduleFailed {
                        seq,
                        error: format!("{err}. {}", err.suggestion()),
                    })
                    .await;
            }
        }
    });
}

/// Start one update-poller cycle. The task ends after signalling a feed
/// change; the caller re-arms by spawning a fresh one on consume.
pub fn spawn_update_poller(
    client: &FeedClient,
    tx: &mpsc::Sender<AsyncAction>,
) -> JoinHandle<()> {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let fetch = || {
            let client = client.clone();
            async move { client.fetch_raw().await }
        };
        updater::run_poller(fetch, tx).await;
    })
}
