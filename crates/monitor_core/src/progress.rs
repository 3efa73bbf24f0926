/// One reading of `/progress`. Never merged with earlier readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub percentage: u8,
    /// `None` when the server omitted the flag.
    pub running: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    InProgress,
    Finished,
    Unknown,
}

impl ProgressSnapshot {
    /// Build a snapshot from the raw reported values. A missing or
    /// non-finite percentage reads as 0; anything else is clamped to 0..=100.
    pub fn from_reported(progress: Option<f64>, running: Option<bool>) -> Self {
        let percentage = match progress {
            Some(value) if value.is_finite() => value.clamp(0.0, 100.0).round() as u8,
            _ => 0,
        };
        Self {
            percentage,
            running,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self.running {
            Some(true) => RunStatus::InProgress,
            Some(false) => RunStatus::Finished,
            None => RunStatus::Unknown,
        }
    }
}
