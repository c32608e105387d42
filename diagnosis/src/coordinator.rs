//! The synchronous half of the diagnosis state machine. Every asynchronous
//! operation is split into a `begin_*` transition that hands out a
//! [`Ticket`] and a `finish_*` transition that applies the outcome only if
//! that ticket is still current.

use shared::{HistoryRecord, PlantType};

use crate::acquisition::{ImagePayload, ImageSlot, UploadedImage};
use crate::config::Messages;
use crate::dialog::{ResultDialog, ResultSource};
use crate::error::{DiagnosisError, HistoryError, PreconditionError, ValidationError};
use crate::navigation::NavigationTarget;
use crate::prediction::PredictionResult;
use crate::selection::PlantSelection;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Uploading,
    AwaitingPrediction,
    Success(PredictionResult),
    Failed(String),
}

impl RequestState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading | Self::AwaitingPrediction)
    }
}

/// Identity of one asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic counter; only the most recently issued ticket is current.
#[derive(Debug, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn advance(&mut self) -> Ticket {
        self.0 += 1;
        Ticket(self.0)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}

/// How an asynchronous completion was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<T> {
    Applied(T),
    /// A reset or newer operation took over; nothing was changed.
    Superseded,
}

impl<T> Completion<T> {
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Superseded => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Workflow {
    selection: PlantSelection,
    images: ImageSlot,
    dialog: ResultDialog,
    request: RequestState,
    requests: Generation,
    lookups: Generation,
}

impl Workflow {
    pub fn request_state(&self) -> &RequestState {
        &self.request
    }

    pub fn selection(&self) -> Option<PlantType> {
        self.selection.current()
    }

    pub fn images(&self) -> &ImageSlot {
        &self.images
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.images.current()
    }

    pub fn dialog(&self) -> &ResultDialog {
        &self.dialog
    }

    pub fn select(&mut self, plant: PlantType) {
        self.selection.select(plant);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// First unmet submit condition, busy states before missing input.
    pub fn readiness(&self) -> Result<(), PreconditionError> {
        match self.request {
            RequestState::AwaitingPrediction => Err(PreconditionError::AlreadyInProgress),
            RequestState::Uploading => Err(PreconditionError::UploadInProgress),
            _ if self.selection.current().is_none() => Err(PreconditionError::NoPlantSelected),
            _ if self.images.current().is_none() => Err(PreconditionError::NoImage),
            _ => Ok(()),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.readiness().is_ok()
    }

    /// Failure text for the inline alert; hidden while a dialog is open.
    pub fn inline_error(&self) -> Option<&str> {
        match &self.request {
            RequestState::Failed(message) if !self.dialog.is_open() => Some(message),
            _ => None,
        }
    }

    /// Starting an upload supersedes any in-flight upload or prediction.
    pub fn begin_upload(&mut self, file_name: String) -> Ticket {
        if self.request == RequestState::AwaitingPrediction {
            log::info!("New image replaces the one awaiting prediction");
        }
        let ticket = self.requests.advance();
        self.images.begin(file_name);
        self.request = RequestState::Uploading;
        ticket
    }

    pub fn finish_upload(
        &mut self,
        ticket: Ticket,
        decoded: Result<UploadedImage, ValidationError>,
    ) -> Result<Completion<UploadedImage>, ValidationError> {
        if !self.requests.is_current(ticket) {
            log::debug!("Discarding stale image decode");
            return Ok(Completion::Superseded);
        }

        self.request = RequestState::Idle;
        match decoded {
            Ok(image) => {
                self.images.finish(Some(image.clone()));
                Ok(Completion::Applied(image))
            }
            Err(e) => {
                self.images.finish(None);
                Err(e)
            }
        }
    }

    pub fn begin_submit(&mut self) -> Result<(Ticket, PlantType, ImagePayload), PreconditionError> {
        self.readiness()?;
        let plant = self.selection.current().ok_or(PreconditionError::NoPlantSelected)?;
        let payload = self
            .images
            .current()
            .map(|image| image.payload.clone())
            .ok_or(PreconditionError::NoImage)?;

        let ticket = self.requests.advance();
        self.lookups.advance();
        self.request = RequestState::AwaitingPrediction;
        self.dialog.clear();
        Ok((ticket, plant, payload))
    }

    /// Success opens the dialog; any failure lands in `Failed`. Both leave
    /// `AwaitingPrediction`.
    pub fn finish_prediction(
        &mut self,
        ticket: Ticket,
        outcome: Result<PredictionResult, DiagnosisError>,
        messages: &Messages,
    ) -> Result<Completion<PredictionResult>, DiagnosisError> {
        if !self.requests.is_current(ticket) {
            log::debug!("Discarding stale prediction response");
            return Ok(Completion::Superseded);
        }

        match outcome {
            Ok(result) => {
                self.request = RequestState::Success(result.clone());
                self.dialog.open(result.clone(), ResultSource::Prediction);
                Ok(Completion::Applied(result))
            }
            Err(e) => {
                self.request = RequestState::Failed(e.user_message(messages));
                Err(e)
            }
        }
    }

    /// Called when a pending operation is dropped before finishing.
    pub fn abandon(&mut self, ticket: Ticket) {
        if self.requests.is_current(ticket) && self.request.is_busy() {
            log::debug!("Pending operation dropped, returning to idle");
            self.images.finish(None);
            self.request = RequestState::Idle;
        }
    }

    /// Clears the image and invalidates whatever is in flight, history
    /// lookups included. A finished `Success`/`Failed` state is left for the
    /// user to see.
    pub fn reset(&mut self) {
        self.requests.advance();
        self.lookups.advance();
        self.images.clear();
        if self.request.is_busy() {
            self.request = RequestState::Idle;
        }
    }

    pub fn close_dialog(&mut self) {
        self.dialog.close();
    }

    /// Image reference the full-result view would receive, if the last
    /// result has one.
    fn full_result_image(&self) -> Option<&str> {
        match &self.dialog.active()?.source {
            ResultSource::Prediction => Some(self.images.current()?.preview.as_str()),
            ResultSource::History { image } => image.as_deref(),
        }
    }

    pub fn can_view_full_result(&self) -> bool {
        self.full_result_image().is_some()
    }

    pub fn full_result_target(&mut self, route: &str) -> Option<NavigationTarget> {
        let image = self.full_result_image()?;
        let active = self.dialog.active()?;
        let target = NavigationTarget::for_result(route, &active.result, image);
        self.dialog.close();
        Some(target)
    }

    pub fn begin_lookup(&mut self) -> Ticket {
        self.lookups.advance()
    }

    pub fn finish_lookup(
        &mut self,
        ticket: Ticket,
        found: Result<HistoryRecord, HistoryError>,
    ) -> Result<Completion<PredictionResult>, HistoryError> {
        if !self.lookups.is_current(ticket) {
            log::debug!("Discarding superseded history lookup");
            return Ok(Completion::Superseded);
        }

        let record = found?;
        let result = PredictionResult::from(&record);
        self.dialog.open(
            result.clone(),
            ResultSource::History {
                image: record.image_url,
            },
        );
        Ok(Completion::Applied(result))
    }
}
