use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Complete job document as submitted to the backend
///
/// The document stays an open JSON object so that overrides may carry keys
/// the scheduler does not know about (`worker`, `device`, extra `jobInfo`
/// fields). The accessors cover the keys the scheduler itself reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDescriptor(Map<String, Value>);

impl JobDescriptor {
    pub fn from_document(document: Map<String, Value>) -> Self {
        Self(document)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn job_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn state(&self) -> Option<&str> {
        self.0.get("state").and_then(Value::as_str)
    }

    pub fn job_info(&self) -> Option<&Map<String, Value>> {
        self.0.get("jobInfo").and_then(Value::as_object)
    }

    /// Look up a `jobInfo` string field such as `bundleId` or `storeCountry`
    pub fn job_info_str(&self, key: &str) -> Option<&str> {
        self.job_info()
            .and_then(|info| info.get(key))
            .and_then(Value::as_str)
    }

    pub fn bundle_id(&self) -> Option<&str> {
        self.job_info_str("bundleId")
    }
}
