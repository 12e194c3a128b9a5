//! The external stop signal: a watch-channel flag workers check between
//! claims. In-flight requests are never force-aborted; they are bounded
//! only by their own per-request timeout.
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type StopSender = watch::Sender<bool>;
pub type StopReceiver = watch::Receiver<bool>;

#[must_use]
pub fn stop_channel() -> (StopSender, StopReceiver) {
    watch::channel(false)
}

/// Flips the stop flag on Ctrl-C (and SIGTERM on unix).
pub fn spawn_signal_handler(stop_tx: StopSender) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            let mut term_signal = match signal(SignalKind::terminate()) {
                Ok(term_signal) => Some(term_signal),
                Err(err) => {
                    eprintln!("Failed to register SIGTERM handler: {}", err);
                    None
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                () = async {
                    if let Some(term_signal) = term_signal.as_mut() {
                        term_signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {}
            }
        }

        #[cfg(not(unix))]
        {
            drop(tokio::signal::ctrl_c().await);
        }

        info!("Stop signal received; letting in-flight requests finish.");
        drop(stop_tx.send(true));
    })
}

/// Flips the stop flag once `cap` elapses, bounding the whole run.
pub fn spawn_duration_cap(stop_tx: StopSender, cap: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(cap).await;
        info!("Run duration cap reached; stopping new claims.");
        drop(stop_tx.send(true));
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{spawn_duration_cap, stop_channel};

    #[test]
    fn duration_cap_flips_the_flag() -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("runtime build failed: {err}"))?;
        runtime.block_on(async {
            let (stop_tx, mut stop_rx) = stop_channel();
            if *stop_rx.borrow() {
                return Err("flag set before the cap".to_owned());
            }
            let handle = spawn_duration_cap(stop_tx, Duration::from_millis(5));
            stop_rx
                .changed()
                .await
                .map_err(|err| format!("stop channel closed early: {err}"))?;
            if !*stop_rx.borrow() {
                return Err("cap elapsed without setting the flag".to_owned());
            }
            drop(handle.await);
            Ok(())
        })
    }
}
