//! Client-side workflow for plant disease diagnosis: image acquisition,
//! plant selection, the prediction request state machine, the result
//! dialog and history lookups.
//!
//! All state lives in a single-threaded [`DiagnosisSession`]. Asynchronous
//! completions carry a generation ticket and are discarded when a reset or
//! a newer operation has superseded them.

pub mod acquisition;
pub mod config;
pub mod coordinator;
pub mod dialog;
pub mod error;
pub mod history;
pub mod navigation;
pub mod prediction;
pub mod selection;
pub mod session;

pub use acquisition::{ImageFile, ImagePayload, RawFile, UploadedImage};
pub use config::{DiagnosisConfig, PlantOption};
pub use coordinator::{Completion, RequestState};
pub use dialog::ResultDialog;
pub use error::{
    ConfigError, DiagnosisError, HistoryError, PreconditionError, ServiceError, TransportError,
    ValidationError,
};
pub use history::{HistoryStore, InMemoryHistory};
pub use navigation::NavigationTarget;
pub use prediction::{PredictionResult, PredictionService, interpret_response};
pub use session::{DiagnosisSession, Pending, Timer};
