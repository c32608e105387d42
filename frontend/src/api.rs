use diagnosis::{
    HistoryStore, ImageFile, ImagePayload, PredictionService, Timer, TransportError,
    interpret_response,
};
use diagnosis::config::ApiConfig;
use gloo_file::{Blob, File as GlooFile};
use gloo_net::http::{Request, Response};
use serde_json::Value;
use shared::{ApiResponse, HistoryId, HistoryRecord, PlantType};
use std::error::Error;
use std::future::Future;
use std::time::Duration;
use wasm_bindgen::JsValue;

fn js_error(value: JsValue) -> TransportError {
    TransportError::Network(format!("{:?}", value))
}

fn network_error(err: gloo_net::Error) -> TransportError {
    TransportError::Network(err.to_string())
}

/// Posts the plant type and image as multipart form data.
pub struct HttpPredictionService {
    url: String,
}

impl HttpPredictionService {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            url: format!("{}{}", api.base_url, api.predict_path),
        }
    }
}

impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        plant: PlantType,
        image: ImagePayload,
    ) -> Result<ApiResponse<Value>, TransportError> {
        let form_data = web_sys::FormData::new().map_err(js_error)?;
        form_data
            .append_with_str("tanaman", plant.as_ref())
            .map_err(js_error)?;

        let blob = Blob::new_with_options(&*image.bytes, Some(&image.mime_type));
        form_data
            .append_with_blob_and_filename("image", blob.as_ref(), &image.file_name)
            .map_err(js_error)?;

        let response = Request::post(&self.url)
            .body(form_data)
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)?;

        read_response(response).await
    }
}

async fn read_response(response: Response) -> Result<ApiResponse<Value>, TransportError> {
    let status = response.status();
    let body = response.text().await.map_err(network_error)?;
    interpret_response(status, &body)
}

pub struct HttpHistoryStore {
    url: String,
}

impl HttpHistoryStore {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            url: format!("{}{}", api.base_url, api.history_path),
        }
    }
}

impl HistoryStore for HttpHistoryStore {
    async fn list(&self) -> Result<Vec<HistoryRecord>, TransportError> {
        let response = Request::get(&self.url)
            .send()
            .await
            .map_err(network_error)?;
        let envelope = read_response(response).await?;
        let records = envelope.data.unwrap_or(Value::Array(Vec::new()));
        serde_json::from_value(records).map_err(|e| TransportError::InvalidBody(e.to_string()))
    }

    async fn find(&self, id: &HistoryId) -> Result<Option<HistoryRecord>, TransportError> {
        let response = Request::get(&format!("{}/{}", self.url, id))
            .send()
            .await
            .map_err(network_error)?;
        if response.status() == 404 {
            return Ok(None);
        }

        match read_response(response).await?.data {
            Some(record) => serde_json::from_value(record)
                .map(Some)
                .map_err(|e| TransportError::InvalidBody(e.to_string())),
            None => Ok(None),
        }
    }
}

pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        gloo_timers::future::sleep(duration)
    }
}

/// A file picked through the `<input type="file">` element.
pub struct BrowserFile(pub GlooFile);

impl ImageFile for BrowserFile {
    fn name(&self) -> String {
        self.0.name()
    }

    fn size(&self) -> u64 {
        self.0.size()
    }

    fn mime_type(&self) -> String {
        self.0.raw_mime_type()
    }

    async fn read(self) -> Result<Vec<u8>, Box<dyn Error>> {
        let bytes = gloo_file::futures::read_as_bytes(&self.0).await?;
        Ok(bytes)
    }
}
