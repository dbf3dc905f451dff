use std::time::Duration;

/// Banner durations used by the action dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimings {
    pub validation_banner: Duration,
    pub outcome_banner: Duration,
}

impl Default for ClientTimings {
    fn default() -> Self {
        Self {
            validation_banner: Duration::from_secs(3),
            outcome_banner: Duration::from_secs(5),
        }
    }
}
