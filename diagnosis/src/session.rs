use futures::future::{Either, FutureExt, LocalBoxFuture, select};
use shared::{HistoryRecord, PlantType};
use std::cell::{Ref, RefCell};
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::time::Duration;

use crate::acquisition::{self, ImageFile, ImagePayload, UploadedImage};
use crate::config::DiagnosisConfig;
use crate::coordinator::{Completion, RequestState, Ticket, Workflow};
use crate::error::{DiagnosisError, HistoryError, PreconditionError, TransportError, ValidationError};
use crate::history::{HistoryStore, parse_history_id};
use crate::navigation::NavigationTarget;
use crate::prediction::{PredictionResult, PredictionService};

/// Completion future of an operation that already passed its synchronous
/// checks.
pub type Pending<T, E> = LocalBoxFuture<'static, Result<Completion<T>, E>>;

pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

struct Shared<P, H, T> {
    config: DiagnosisConfig,
    predictor: P,
    history: H,
    timer: T,
    workflow: RefCell<Workflow>,
}

/// Page-scoped diagnosis session. Cheap to clone; clones share state.
/// Single-threaded: futures it hands out are `!Send`.
pub struct DiagnosisSession<P, H, T> {
    shared: Rc<Shared<P, H, T>>,
}

impl<P, H, T> Clone for DiagnosisSession<P, H, T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

/// Returns the workflow to idle if a pending operation is dropped before it
/// finishes.
struct InFlight<P, H, T> {
    session: DiagnosisSession<P, H, T>,
    ticket: Ticket,
    armed: bool,
}

impl<P, H, T> InFlight<P, H, T> {
    fn new(session: DiagnosisSession<P, H, T>, ticket: Ticket) -> Self {
        Self {
            session,
            ticket,
            armed: true,
        }
    }

    fn disarm(mut self) -> DiagnosisSession<P, H, T> {
        self.armed = false;
        self.session.clone()
    }
}

impl<P, H, T> Drop for InFlight<P, H, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.session.shared.workflow.try_borrow_mut() {
            Ok(mut workflow) => workflow.abandon(self.ticket),
            Err(_) => log::warn!("Workflow busy while dropping a pending operation; state not reset"),
        }
    }
}

impl<P, H, T> DiagnosisSession<P, H, T>
where
    P: PredictionService + 'static,
    H: HistoryStore + 'static,
    T: Timer + 'static,
{
    pub fn new(config: DiagnosisConfig, predictor: P, history: H, timer: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                config,
                predictor,
                history,
                timer,
                workflow: RefCell::new(Workflow::default()),
            }),
        }
    }

    pub fn config(&self) -> &DiagnosisConfig {
        &self.shared.config
    }

    /// Read access for rendering. Do not hold across an `.await`.
    pub fn workflow(&self) -> Ref<'_, Workflow> {
        self.shared.workflow.borrow()
    }

    pub fn request_state(&self) -> RequestState {
        self.workflow().request_state().clone()
    }

    pub fn readiness(&self) -> Result<(), PreconditionError> {
        self.workflow().readiness()
    }

    pub fn can_submit(&self) -> bool {
        self.workflow().can_submit()
    }

    pub fn inline_error(&self) -> Option<String> {
        self.workflow().inline_error().map(str::to_string)
    }

    pub fn is_dialog_open(&self) -> bool {
        self.workflow().dialog().is_open()
    }

    pub fn select(&self, plant: PlantType) {
        self.shared.workflow.borrow_mut().select(plant);
    }

    pub fn clear_selection(&self) {
        self.shared.workflow.borrow_mut().clear_selection();
    }

    pub fn reset(&self) {
        self.shared.workflow.borrow_mut().reset();
    }

    pub fn close_dialog(&self) {
        self.shared.workflow.borrow_mut().close_dialog();
    }

    pub fn can_view_full_result(&self) -> bool {
        self.workflow().can_view_full_result()
    }

    pub fn navigate_to_full_result(&self) -> Option<NavigationTarget> {
        let route = self.shared.config.result_route.as_str();
        let target = self.shared.workflow.borrow_mut().full_result_target(route);
        if let Some(target) = &target {
            log::info!("Opening full result at {}", target.route);
        }
        target
    }

    pub fn accept_file<F>(&self, file: F) -> Result<Pending<UploadedImage, ValidationError>, ValidationError>
    where
        F: ImageFile + 'static,
    {
        let name = file.name();
        let mime_type = file.mime_type();
        let max = self.shared.config.max_upload_bytes;

        if let Err(e) = acquisition::check_size(file.size(), max).and_then(|_| acquisition::check_type(&mime_type)) {
            log::warn!("Rejected {}: {}", name, e);
            return Err(e);
        }

        let ticket = self.shared.workflow.borrow_mut().begin_upload(name.clone());
        let guard = InFlight::new(self.clone(), ticket);

        Ok(async move {
            let decoded = match file.read().await {
                Ok(bytes) => acquisition::decode_image(&name, &mime_type, bytes, max),
                Err(e) => {
                    log::warn!("Failed to read {}: {}", name, e);
                    Err(ValidationError::UnreadableImage)
                }
            };
            let session = guard.disarm();
            session.shared.workflow.borrow_mut().finish_upload(ticket, decoded)
        }
        .boxed_local())
    }

    pub fn simulate_capture(&self) -> Pending<UploadedImage, ValidationError> {
        let file_name = self.shared.config.capture.file_name.clone();
        let ticket = self.shared.workflow.borrow_mut().begin_upload(file_name);
        let guard = InFlight::new(self.clone(), ticket);

        async move {
            let delay = guard.session.shared.config.capture_delay();
            guard.session.shared.timer.sleep(delay).await;
            let session = guard.disarm();
            let captured = acquisition::placeholder_capture(&session.shared.config);
            session.shared.workflow.borrow_mut().finish_upload(ticket, captured)
        }
        .boxed_local()
    }

    /// Checks readiness synchronously and, if ready, issues exactly one
    /// prediction request.
    pub fn submit(&self) -> Result<Pending<PredictionResult, DiagnosisError>, PreconditionError> {
        let (ticket, plant, payload) = self
            .shared
            .workflow
            .borrow_mut()
            .begin_submit()
            .inspect_err(|e| log::info!("Submit refused: {}", e))?;

        log::info!("Requesting diagnosis of {} for {}", payload.file_name, plant);
        let guard = InFlight::new(self.clone(), ticket);

        Ok(async move {
            let outcome = guard.session.request_prediction(plant, payload).await;
            let session = guard.disarm();
            match &outcome {
                Ok(result) => log::info!(
                    "Diagnosis {} ({:.2}) received",
                    result.disease_id,
                    result.confidence
                ),
                Err(e) => log::warn!("Diagnosis failed: {}", e),
            }
            session.shared.workflow.borrow_mut().finish_prediction(
                ticket,
                outcome,
                &session.shared.config.messages,
            )
        }
        .boxed_local())
    }

    async fn request_prediction(&self, plant: PlantType, payload: ImagePayload) -> Result<PredictionResult, DiagnosisError> {
        let call = pin!(self.shared.predictor.predict(plant, payload));

        let response = match self.shared.config.request_timeout() {
            None => call.await?,
            Some(limit) => {
                let expiry = pin!(self.shared.timer.sleep(limit));
                match select(call, expiry).await {
                    Either::Left((response, _)) => response?,
                    Either::Right(_) => return Err(TransportError::Timeout(limit).into()),
                }
            }
        };

        Ok(PredictionResult::from_response(response)?)
    }

    /// Looks up a past diagnosis and shows it in the result dialog. A newer
    /// lookup supersedes an older one.
    pub fn view_detail(&self, id: &str) -> Result<Pending<PredictionResult, HistoryError>, HistoryError> {
        let id = parse_history_id(id)?;
        let ticket = self.shared.workflow.borrow_mut().begin_lookup();
        let session = self.clone();

        Ok(async move {
            let lookup = session.shared.history.find(&id).await;
            let found = match lookup {
                Ok(Some(record)) => Ok(record),
                Ok(None) => Err(HistoryError::NotFound(id)),
                Err(e) => Err(HistoryError::from(e)),
            };
            if let Err(e) = &found {
                log::warn!("History lookup failed: {}", e);
            }
            session.shared.workflow.borrow_mut().finish_lookup(ticket, found)
        }
        .boxed_local())
    }

    pub fn load_history(&self) -> LocalBoxFuture<'static, Result<Vec<HistoryRecord>, TransportError>> {
        let session = self.clone();
        async move { session.shared.history.list().await }.boxed_local()
    }
}
