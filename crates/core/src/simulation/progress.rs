//! Stage progress notifications and cooperative cancellation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    BaselineField,
    TreeEffects,
    Dispersion,
    ImpactZones,
    Summary,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::BaselineField,
        Stage::TreeEffects,
        Stage::Dispersion,
        Stage::ImpactZones,
        Stage::Summary,
    ];

    /// Nominal completion percentage reported when the stage starts
    pub fn percent(self) -> u8 {
        match self {
            Stage::BaselineField => 10,
            Stage::TreeEffects => 30,
            Stage::Dispersion => 50,
            Stage::ImpactZones => 80,
            Stage::Summary => 90,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Stage::BaselineField => "Building baseline pollution field",
            Stage::TreeEffects => "Computing tree effects",
            Stage::Dispersion => "Running dispersion model",
            Stage::ImpactZones => "Building impact zones",
            Stage::Summary => "Aggregating summary",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::BaselineField => "baseline field",
            Stage::TreeEffects => "tree effects",
            Stage::Dispersion => "dispersion",
            Stage::ImpactZones => "impact zones",
            Stage::Summary => "summary",
        };
        f.write_str(name)
    }
}

/// One progress notification. `stage` is `None` for the final 100 % event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub stage: Option<Stage>,
    pub percent: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn started(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            percent: stage.percent(),
            message: stage.message().to_string(),
        }
    }

    pub fn complete() -> Self {
        Self {
            stage: None,
            percent: 100,
            message: "Simulation complete".to_string(),
        }
    }
}

/// Fire-and-forget progress consumer. Implementations must not block.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(event);
    }
}

// A dropped receiver is not an error
impl ProgressSink for Sender<ProgressEvent> {
    fn report(&self, event: ProgressEvent) {
        let _ = self.send(event);
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Shared flag checked between stages
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_stage_percent_increases() {
        let percents: Vec<u8> = Stage::ALL.iter().map(|s| s.percent()).collect();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert!(percents.iter().all(|&p| p < 100));
    }

    #[test]
    fn test_sender_sink_ignores_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        tx.report(ProgressEvent::started(Stage::Dispersion));
        assert_eq!(rx.recv().map(|e| e.percent), Ok(50));

        drop(rx);
        tx.report(ProgressEvent::complete());
    }

    #[test]
    fn test_cancellation_shared_between_clones() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
