use serde_json::Value;
use shared::{ApiResponse, PlantType, PredictionData};
use std::future::Future;

use crate::acquisition::ImagePayload;
use crate::error::{ServiceError, TransportError};

/// The remote classifier. Implementations only move bytes; interpreting the
/// answer is left to [`PredictionResult::from_response`].
pub trait PredictionService {
    fn predict(
        &self,
        plant: PlantType,
        image: ImagePayload,
    ) -> impl Future<Output = Result<ApiResponse<Value>, TransportError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub disease_id: String,
    pub plant_type: PlantType,
    pub confidence: f64,
    /// Provider payload as received, for the detail view.
    pub raw: Value,
}

impl PredictionResult {
    pub fn from_response(response: ApiResponse<Value>) -> Result<Self, ServiceError> {
        let ApiResponse {
            status,
            message,
            data,
        } = response;

        let raw = match data {
            Some(raw) if status == 200 && !raw.is_null() => raw,
            _ => return Err(ServiceError::Rejected { status, message }),
        };

        let parsed: PredictionData = serde_json::from_value(raw.clone())
            .map_err(|e| ServiceError::MalformedPayload(e.to_string()))?;

        if parsed.disease.id.trim().is_empty() {
            return Err(ServiceError::MalformedPayload("empty disease id".into()));
        }
        if !(0.0..=1.0).contains(&parsed.confidence) {
            return Err(ServiceError::MalformedPayload(format!(
                "confidence {} outside [0, 1]",
                parsed.confidence
            )));
        }

        Ok(Self {
            disease_id: parsed.disease.id,
            plant_type: parsed.plant_type,
            confidence: parsed.confidence,
            raw,
        })
    }
}

/// Maps a raw HTTP exchange onto the service contract. Non-2xx statuses are
/// transport failures; the body's `message` field is kept when present.
pub fn interpret_response(status: u16, body: &str) -> Result<ApiResponse<Value>, TransportError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| value.get("message")?.as_str().map(str::to_string));
        return Err(TransportError::Status { status, message });
    }

    serde_json::from_str(body).map_err(|e| TransportError::InvalidBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(confidence: f64) -> Value {
        json!({ "disease": { "id": "d1", "name": "Leaf spot" }, "tanaman": "tomat", "confidence": confidence })
    }

    #[test]
    fn well_formed_success_becomes_result() {
        let result = PredictionResult::from_response(ApiResponse::ok(body(0.87))).unwrap();
        assert_eq!(result.disease_id, "d1");
        assert_eq!(result.plant_type, PlantType::Tomat);
        assert_eq!(result.confidence, 0.87);
        assert_eq!(result.raw["disease"]["name"], "Leaf spot");
    }

    #[test]
    fn failure_indicator_is_rejected_with_message() {
        let err = PredictionResult::from_response(ApiResponse::failed(400, "Image is blurry")).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Rejected {
                status: 400,
                message: Some("Image is blurry".into())
            }
        );

        let missing = ApiResponse::<Value> {
            status: 200,
            message: None,
            data: None,
        };
        assert!(matches!(
            PredictionResult::from_response(missing),
            Err(ServiceError::Rejected { status: 200, .. })
        ));
    }

    #[test]
    fn malformed_payloads_are_detected() {
        let no_disease = ApiResponse::ok(json!({ "tanaman": "tomat", "confidence": 0.5 }));
        assert!(matches!(
            PredictionResult::from_response(no_disease),
            Err(ServiceError::MalformedPayload(_))
        ));

        let unknown_plant = ApiResponse::ok(json!({ "disease": { "id": "x" }, "tanaman": "kentang", "confidence": 0.5 }));
        assert!(matches!(
            PredictionResult::from_response(unknown_plant),
            Err(ServiceError::MalformedPayload(_))
        ));

        assert!(matches!(
            PredictionResult::from_response(ApiResponse::ok(body(1.5))),
            Err(ServiceError::MalformedPayload(_))
        ));
    }

    #[test]
    fn http_status_and_body_mapping() {
        let ok = interpret_response(200, r#"{"status":200,"data":{"x":1}}"#).unwrap();
        assert_eq!(ok.status, 200);

        assert_eq!(
            interpret_response(503, r#"{"message":"Model is warming up"}"#),
            Err(TransportError::Status {
                status: 503,
                message: Some("Model is warming up".into())
            })
        );
        assert_eq!(
            interpret_response(502, "<html>bad gateway</html>"),
            Err(TransportError::Status {
                status: 502,
                message: None
            })
        );
        assert!(matches!(
            interpret_response(200, "not json"),
            Err(TransportError::InvalidBody(_))
        ));
    }
}
