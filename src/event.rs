use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

#[derive(Clone, Debug)]
pub enum Event {
    Tick(Instant),
    Shutdown,
}

/// Produces sampling ticks at a fixed period until Ctrl-C.
///
/// Runs on the same current-thread runtime as the loop that consumes it, so a
/// tick is never handled while the previous one is still in progress.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    /// `tick_rate` must be non-zero.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut tick_interval = tokio::time::interval(tick_rate);
            tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let shutdown = tokio::signal::ctrl_c();
            tokio::pin!(shutdown);
            let mut listening = true;

            loop {
                tokio::select! {
                    signal = &mut shutdown, if listening => {
                        match signal {
                            Ok(()) => {
                                let _ = tx.send(Event::Shutdown);
                                break;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                                listening = false;
                            }
                        }
                    }
                    at = tick_interval.tick() => {
                        if tx.send(Event::Tick(at.into_std())).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
