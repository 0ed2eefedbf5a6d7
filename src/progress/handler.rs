//! Progress handler trait and events

use crate::template::Confidence;
use std::time::Duration;

/// Events emitted while a takeoff submission is processed
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Workflow started
    Started { workflow_id: String },

    PhaseStarted { phase: String },

    PhaseComplete { phase: String, duration: Duration },

    /// Field validation finished
    ValidationComplete { warnings: usize, errors: usize },

    /// A template was chosen for the takeoff
    TemplateSelected {
        template_id: String,
        confidence: Confidence,
        fallback: bool,
    },

    /// Workflow finished, successfully or stopped by validation
    Completed {
        workflow_id: String,
        status: String,
        total_time: Duration,
    },

    /// Workflow aborted by an unexpected error
    Failed { workflow_id: String, error: String },
}

/// Trait for handling progress events during a workflow run
pub trait ProgressHandler: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::Started {
            workflow_id: "ab12cd34".to_string(),
        });
        handler.on_progress(&ProgressEvent::ValidationComplete {
            warnings: 1,
            errors: 0,
        });
        handler.on_progress(&ProgressEvent::Completed {
            workflow_id: "ab12cd34".to_string(),
            status: "success".to_string(),
            total_time: Duration::from_millis(40),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::PhaseStarted {
            phase: "SelectTemplate".to_string(),
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("PhaseStarted"));
        assert!(debug_str.contains("SelectTemplate"));
    }
}
