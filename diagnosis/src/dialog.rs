use crate::prediction::PredictionResult;

/// Where the bound result came from; decides which image reference the
/// full-result view receives.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSource {
    /// Uses the session's current upload.
    Prediction,
    History { image: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveResult {
    pub result: PredictionResult,
    pub source: ResultSource,
}

/// Result dialog lifecycle. Closing keeps the last result so the
/// full-result view can still be reached until the next submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResultDialog {
    #[default]
    Empty,
    Open(ActiveResult),
    Dismissed(ActiveResult),
}

impl ResultDialog {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Last bound result, open or not.
    pub fn active(&self) -> Option<&ActiveResult> {
        match self {
            Self::Open(active) | Self::Dismissed(active) => Some(active),
            Self::Empty => None,
        }
    }

    pub fn open_result(&self) -> Option<&PredictionResult> {
        match self {
            Self::Open(active) => Some(&active.result),
            _ => None,
        }
    }

    pub(crate) fn open(&mut self, result: PredictionResult, source: ResultSource) {
        *self = Self::Open(ActiveResult { result, source });
    }

    pub fn close(&mut self) {
        *self = match std::mem::take(self) {
            Self::Open(active) => Self::Dismissed(active),
            other => other,
        };
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::Empty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use shared::PlantType;

    fn result() -> PredictionResult {
        PredictionResult {
            disease_id: "late_blight".into(),
            plant_type: PlantType::Tomat,
            confidence: 0.5,
            raw: Value::Null,
        }
    }

    #[test]
    fn close_keeps_result() {
        let mut dialog = ResultDialog::default();
        dialog.open(result(), ResultSource::Prediction);
        assert!(dialog.is_open());

        dialog.close();
        assert!(!dialog.is_open());
        assert!(dialog.open_result().is_none());
        assert_eq!(dialog.active().unwrap().result.disease_id, "late_blight");

        dialog.close();
        assert!(dialog.active().is_some());
    }

    #[test]
    fn clear_forgets_result() {
        let mut dialog = ResultDialog::default();
        dialog.open(result(), ResultSource::History { image: None });
        dialog.clear();
        assert_eq!(dialog, ResultDialog::Empty);
    }
}
