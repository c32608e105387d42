use std::borrow::Cow;
use url::form_urlencoded;

use crate::prediction::PredictionResult;

pub const DISEASE_ID: &str = "diseaseId";
pub const PLANT_TYPE: &str = "plantType";
pub const CONFIDENCE: &str = "confidence";
pub const IMAGE: &str = "image";

/// Route plus query parameters handed to the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub route: String,
    pub params: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation target has no query string")]
    MissingQuery,
    #[error("image reference is not valid percent-encoded UTF-8")]
    InvalidImage,
}

impl NavigationTarget {
    /// The image value is percent-encoded before the whole query is
    /// form-encoded, so it survives as a single opaque parameter.
    pub fn for_result(route: &str, result: &PredictionResult, image: &str) -> Self {
        Self {
            route: route.to_string(),
            params: vec![
                (DISEASE_ID.to_string(), result.disease_id.clone()),
                (PLANT_TYPE.to_string(), result.plant_type.to_string()),
                (CONFIDENCE.to_string(), result.confidence.to_string()),
                (IMAGE.to_string(), urlencoding::encode(image).into_owned()),
            ],
        }
    }

    pub fn to_url(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();
        format!("{}?{}", self.route, query)
    }

    pub fn parse(url: &str) -> Result<Self, NavigationError> {
        let (route, query) = url.split_once('?').ok_or(NavigationError::MissingQuery)?;
        let params = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Ok(Self {
            route: route.to_string(),
            params,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn confidence(&self) -> Option<f64> {
        self.get(CONFIDENCE)?.parse().ok()
    }

    /// The image reference with its own percent-encoding removed.
    pub fn image(&self) -> Result<Option<Cow<'_, str>>, NavigationError> {
        self.get(IMAGE)
            .map(|encoded| urlencoding::decode(encoded).map_err(|_| NavigationError::InvalidImage))
            .transpose()
    }
}
