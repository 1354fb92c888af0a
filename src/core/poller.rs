use crate::utils::error::Result;
use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

pub type TickFuture<'a> = Pin<Box<dyn Future<Output = ControlFlow<()>> + 'a>>;

/// Fixed-interval polling. The first tick fires immediately; a slow tick
/// delays the next one instead of bursting to catch up. The timer lives only
/// as long as the `run`/`until` future, so dropping that future stops it.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    period: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
    Reached(T),
    /// Carries the last successfully probed value, if any.
    TimedOut(Option<T>),
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    fn interval(&self) -> tokio::time::Interval {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Runs `tick` against `state` until it breaks or `shutdown` resolves.
    /// Returns the number of ticks run.
    pub async fn run<S, F, C>(&self, state: &mut S, shutdown: C, mut tick: F) -> usize
    where
        F: for<'a> FnMut(&'a mut S) -> TickFuture<'a>,
        C: Future<Output = ()>,
    {
        let mut interval = self.interval();
        tokio::pin!(shutdown);
        let mut ticks = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::debug!("Polling stopped after {} ticks", ticks);
                    break;
                }
                _ = interval.tick() => {
                    ticks += 1;
                    if tick(state).await.is_break() {
                        break;
                    }
                }
            }
        }
        ticks
    }

    /// Probes until `done` holds or `timeout` elapses. Probe errors are
    /// logged and polling continues.
    pub async fn until<T, F, Fut, D>(&self, timeout: Duration, mut probe: F, done: D) -> Settled<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        D: Fn(&T) -> bool,
    {
        let deadline = Instant::now() + timeout;
        let mut interval = self.interval();
        let mut last = None;

        loop {
            interval.tick().await;
            match probe().await {
                Ok(value) if done(&value) => return Settled::Reached(value),
                Ok(value) => last = Some(value),
                Err(e) => tracing::warn!("Status probe failed: {}", e),
            }
            if Instant::now() + self.period > deadline {
                return Settled::TimedOut(last);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ConsoleError;

    #[tokio::test]
    async fn run_stops_when_tick_breaks() {
        let poller = Poller::new(Duration::from_millis(5));
        let mut seen = Vec::new();

        let ticks = poller
            .run(&mut seen, std::future::pending(), |seen| {
                Box::pin(async move {
                    seen.push(seen.len());
                    if seen.len() == 3 {
                        ControlFlow::Break(())
                    } else {
                        ControlFlow::Continue(())
                    }
                })
            })
            .await;

        assert_eq!(ticks, 3);
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let poller = Poller::new(Duration::from_secs(3600));
        let mut count = 0usize;

        let ticks = poller
            .run(
                &mut count,
                tokio::time::sleep(Duration::from_millis(20)),
                |count| {
                    Box::pin(async move {
                        *count += 1;
                        ControlFlow::Continue(())
                    })
                },
            )
            .await;

        // Only the immediate first tick fits before shutdown.
        assert_eq!(ticks, 1);
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn until_returns_first_settled_value() {
        let poller = Poller::new(Duration::from_millis(5));
        let mut calls = 0;

        let outcome = poller
            .until(
                Duration::from_secs(5),
                || {
                    calls += 1;
                    let value = calls;
                    async move {
                        if value == 2 {
                            Err(ConsoleError::ApiError {
                                status: 503,
                                path: "/admin/feed-providers/x/subscription-status".to_string(),
                                body: String::new(),
                            })
                        } else {
                            Ok(value)
                        }
                    }
                },
                |v| *v >= 3,
            )
            .await;

        assert_eq!(outcome, Settled::Reached(3));
    }

    #[tokio::test]
    async fn until_times_out_with_last_value() {
        let poller = Poller::new(Duration::from_millis(10));
        let outcome = poller
            .until(
                Duration::from_millis(35),
                || async { Ok::<_, ConsoleError>("STARTING") },
                |s| *s == "STARTED",
            )
            .await;
        assert_eq!(outcome, Settled::TimedOut(Some("STARTING")));
    }
}
