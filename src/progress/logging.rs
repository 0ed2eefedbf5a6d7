//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { workflow_id } => {
                info!(workflow_id = %workflow_id, "Starting SOW workflow");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                debug!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::ValidationComplete { warnings, errors } => {
                if *errors > 0 {
                    warn!(warnings, errors, "Validation complete with errors");
                } else if *warnings > 0 {
                    info!(warnings, "Validation complete with warnings");
                } else {
                    debug!("Validation complete");
                }
            }
            ProgressEvent::TemplateSelected {
                template_id,
                confidence,
                fallback,
            } => {
                if *fallback {
                    warn!(template = %template_id, %confidence, "No rule matched, using default template");
                } else {
                    info!(template = %template_id, %confidence, "Template selected");
                }
            }
            ProgressEvent::Completed {
                workflow_id,
                status,
                total_time,
            } => {
                info!(
                    workflow_id = %workflow_id,
                    status = %status,
                    total_time_ms = total_time.as_millis(),
                    "Workflow complete"
                );
            }
            ProgressEvent::Failed { workflow_id, error } => {
                warn!(workflow_id = %workflow_id, error = %error, "Workflow failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Confidence;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started {
                workflow_id: "ab12cd34".to_string(),
            },
            ProgressEvent::PhaseStarted {
                phase: "Validate".to_string(),
            },
            ProgressEvent::PhaseComplete {
                phase: "Validate".to_string(),
                duration: Duration::from_millis(3),
            },
            ProgressEvent::ValidationComplete {
                warnings: 0,
                errors: 2,
            },
            ProgressEvent::TemplateSelected {
                template_id: "T2".to_string(),
                confidence: Confidence::Low,
                fallback: true,
            },
            ProgressEvent::Completed {
                workflow_id: "ab12cd34".to_string(),
                status: "success".to_string(),
                total_time: Duration::from_millis(12),
            },
            ProgressEvent::Failed {
                workflow_id: "ab12cd34".to_string(),
                error: "disk full".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
