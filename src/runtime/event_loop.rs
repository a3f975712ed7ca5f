//! Single-threaded event loop feeding intents and timers to the site.

use tokio::io::{
    AsyncBufRead,
    AsyncBufReadExt,
};
use tokio::sync::mpsc;
use tokio::time::{
    Instant,
    sleep_until,
};

use super::handlers::Dispatcher;
use super::intent::Intent;
use super::site::Site;

/// Counters from one [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub handled: usize,
    pub ignored: usize,
    /// Timer wake-ups (autoplay advances and transition settles).
    pub timers: usize,
}

/// Waits until `deadline`, or forever when there is none.
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Runs until the intent channel closes, then settles pending transitions.
///
/// Each intent and each timer runs to completion before the next one starts.
pub async fn run(
    site: &mut Site,
    dispatcher: &Dispatcher,
    mut intents: mpsc::Receiver<Intent>,
) -> RunSummary {
    let mut summary = RunSummary::default();

    loop {
        let deadline = site.next_deadline();
        tokio::select! {
            intent = intents.recv() => {
                let Some(intent) = intent else {
                    break;
                };
                if dispatcher.dispatch(site, &intent, Instant::now()).is_handled() {
                    summary.handled += 1;
                } else {
                    summary.ignored += 1;
                }
            }
            () = wait_for(deadline) => {
                site.run_due(Instant::now());
                summary.timers += 1;
            }
        }
    }

    site.flush();
    tracing::debug!(?summary, "Event loop finished");
    summary
}

/// Reads one JSON intent per line into `sender` until EOF or until the loop stops listening.
///
/// Blank lines are skipped; malformed lines are logged and skipped. Returns the number of
/// intents forwarded.
pub async fn read_intents<R>(reader: R, sender: mpsc::Sender<Intent>) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Intent>(line) {
            Ok(intent) => {
                if sender.send(intent).await.is_err() {
                    break;
                }
                forwarded += 1;
            }
            Err(e) => tracing::warn!("Skipping malformed intent {:?}: {}", line, e),
        }
    }
    Ok(forwarded)
}
