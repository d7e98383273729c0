//! Countdown to the primary event.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Remaining {
        days: i64,
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
    HappeningNow,
}

impl Countdown {
    pub fn at(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let ms = (target - now).num_milliseconds();
        if ms <= 0 {
            return Countdown::HappeningNow;
        }

        let s = ms / 1000;
        Countdown::Remaining {
            days: s / 86_400,
            hours: (s % 86_400) / 3_600,
            minutes: (s % 3_600) / 60,
            seconds: s % 60,
        }
    }

    /// `"3d 04h 05m 06s"`, or `"<label>: happening now"` once reached.
    pub fn text(&self, label: &str) -> String {
        match self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
                seconds,
            } => format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s"),
            Countdown::HappeningNow => format!("{label}: happening now"),
        }
    }
}

/// The countdown region: what to count towards and its first frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownView {
    pub target: DateTime<Utc>,
    pub label: String,
    pub text: String,
}

impl CountdownView {
    pub fn new(target: DateTime<Utc>, label: String, now: DateTime<Utc>) -> Self {
        let text = Countdown::at(target, now).text(&label);
        CountdownView {
            target,
            label,
            text,
        }
    }
}

/// Recomputes the countdown once per second and publishes it on a watch
/// channel. Only one ticking task exists at a time: starting again aborts
/// the previous one, and the task ends by itself once the event is reached.
pub struct CountdownTicker {
    tx: Arc<watch::Sender<String>>,
    task: Option<JoinHandle<()>>,
}

impl Default for CountdownTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTicker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(String::new());
        CountdownTicker {
            tx: Arc::new(tx),
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Must be called within a tokio runtime.
    pub fn start(&mut self, view: &CountdownView, clock: Arc<dyn Clock>) {
        self.stop();

        let target = view.target;
        let label = view.label.clone();

        let first = Countdown::at(target, clock.now());
        self.tx.send_replace(first.text(&label));
        if first == Countdown::HappeningNow {
            return;
        }

        let tx = Arc::clone(&self.tx);
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let countdown = Countdown::at(target, clock.now());
                tx.send_replace(countdown.text(&label));
                if countdown == Countdown::HappeningNow {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
