#![allow(dead_code)]

use diagnosis::{
    DiagnosisConfig, DiagnosisSession, HistoryStore, ImageFile, ImagePayload, InMemoryHistory,
    PredictionService, RawFile, Timer, TransportError,
};
use futures::channel::oneshot;
use image::{ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use shared::{ApiResponse, HistoryId, HistoryRecord, PlantType};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::error::Error;
use std::future::Future;
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;

pub const MIB: u64 = 1024 * 1024;

pub type Reply = Result<ApiResponse<Value>, TransportError>;
pub type TestSession = DiagnosisSession<ScriptedService, InMemoryHistory, TestTimer>;
pub type GatedHistorySession = DiagnosisSession<ScriptedService, GatedHistory, TestTimer>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A real PNG header followed by zero padding up to `total` bytes.
pub fn png_file(name: &str, total: u64) -> RawFile {
    let frame = RgbImage::from_pixel(16, 16, Rgb([40, 160, 60]));
    let mut out = Cursor::new(Vec::new());
    frame.write_to(&mut out, ImageFormat::Png).unwrap();
    let mut bytes = out.into_inner();
    if (bytes.len() as u64) < total {
        bytes.resize(total as usize, 0);
    }
    RawFile::new(name, "image/png", bytes)
}

pub fn success(disease: &str, plant: PlantType, confidence: f64) -> Reply {
    Ok(ApiResponse::ok(json!({
        "disease": { "id": disease },
        "tanaman": plant.to_string(),
        "confidence": confidence,
    })))
}

pub enum Step {
    Reply(Reply),
    Gate(oneshot::Receiver<Reply>),
    Hang,
}

/// Prediction service answering from a script, recording every request.
#[derive(Default)]
pub struct ScriptedService {
    pub requests: Rc<RefCell<Vec<(PlantType, String)>>>,
    script: RefCell<VecDeque<Step>>,
}

impl ScriptedService {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            requests: Rc::default(),
            script: RefCell::new(steps.into()),
        }
    }
}

impl PredictionService for ScriptedService {
    async fn predict(&self, plant: PlantType, image: ImagePayload) -> Reply {
        self.requests.borrow_mut().push((plant, image.file_name.clone()));
        let step = self.script.borrow_mut().pop_front().unwrap_or(Step::Hang);
        match step {
            Step::Reply(reply) => reply,
            Step::Gate(gate) => gate
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".into()))),
            Step::Hang => std::future::pending().await,
        }
    }
}

#[derive(Clone, Copy)]
pub enum TestTimer {
    Instant,
    Never,
}

impl Timer for TestTimer {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> {
        let instant = matches!(self, TestTimer::Instant);
        async move {
            if !instant {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// File whose bytes arrive only when the test releases them.
pub struct GatedFile {
    pub name: String,
    pub size: u64,
    pub gate: oneshot::Receiver<Vec<u8>>,
}

impl GatedFile {
    pub fn new(name: &str, size: u64) -> (Self, oneshot::Sender<Vec<u8>>) {
        let (tx, gate) = oneshot::channel();
        let file = Self {
            name: name.to_string(),
            size,
            gate,
        };
        (file, tx)
    }
}

impl ImageFile for GatedFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn mime_type(&self) -> String {
        "image/png".to_string()
    }

    async fn read(self) -> Result<Vec<u8>, Box<dyn Error>> {
        Ok(self.gate.await?)
    }
}

/// History store whose single lookup answers only when the test releases it.
pub struct GatedHistory {
    gate: RefCell<Option<oneshot::Receiver<Option<HistoryRecord>>>>,
}

impl HistoryStore for GatedHistory {
    async fn list(&self) -> Result<Vec<HistoryRecord>, TransportError> {
        Ok(Vec::new())
    }

    async fn find(&self, _id: &HistoryId) -> Result<Option<HistoryRecord>, TransportError> {
        let gate = self.gate.borrow_mut().take();
        match gate {
            Some(gate) => Ok(gate.await.unwrap_or(None)),
            None => Ok(None),
        }
    }
}

pub fn gated_history_session(
    steps: Vec<Step>,
) -> (GatedHistorySession, oneshot::Sender<Option<HistoryRecord>>) {
    init_logging();
    let (release, gate) = oneshot::channel();
    let history = GatedHistory {
        gate: RefCell::new(Some(gate)),
    };
    let session = DiagnosisSession::new(
        DiagnosisConfig::default(),
        ScriptedService::new(steps),
        history,
        TestTimer::Never,
    );
    (session, release)
}

pub fn session(steps: Vec<Step>, timer: TestTimer) -> (TestSession, Rc<RefCell<Vec<(PlantType, String)>>>) {
    session_with(DiagnosisConfig::default(), steps, Vec::new(), timer)
}

pub fn session_with(
    config: DiagnosisConfig,
    steps: Vec<Step>,
    history: Vec<HistoryRecord>,
    timer: TestTimer,
) -> (TestSession, Rc<RefCell<Vec<(PlantType, String)>>>) {
    init_logging();
    let service = ScriptedService::new(steps);
    let requests = Rc::clone(&service.requests);
    let session = DiagnosisSession::new(config, service, InMemoryHistory::new(history), timer);
    (session, requests)
}

pub async fn upload<H>(session: &DiagnosisSession<ScriptedService, H, TestTimer>, file: RawFile)
where
    H: HistoryStore + 'static,
{
    session
        .accept_file(file)
        .expect("file passes synchronous checks")
        .await
        .expect("file decodes");
}
