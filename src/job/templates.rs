use serde_json::{Map, Value};

use crate::models::{JobKind, JobState, APP_STORE_APP};

/// Default descriptor values for one job kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTemplate {
    pub kind: JobKind,
    pub state: JobState,
    pub app_type: &'static str,
}

static TEMPLATES: [JobTemplate; 2] = [
    JobTemplate {
        kind: JobKind::Run,
        state: JobState::Pending,
        app_type: APP_STORE_APP,
    },
    JobTemplate {
        kind: JobKind::Dioscope,
        state: JobState::Pending,
        app_type: APP_STORE_APP,
    },
];

impl JobTemplate {
    /// Template for `kind`; falls back to the run template
    pub fn for_kind(kind: JobKind) -> &'static JobTemplate {
        TEMPLATES
            .iter()
            .find(|template| template.kind == kind)
            .unwrap_or(&TEMPLATES[0])
    }

    /// Fresh, owned copy of the template document
    pub fn to_document(&self) -> Map<String, Value> {
        let mut job_info = Map::new();
        job_info.insert("appType".to_string(), Value::from(self.app_type));

        let mut document = Map::new();
        document.insert("type".to_string(), Value::from(self.kind.job_type().as_str()));
        document.insert("state".to_string(), Value::from(self.state.as_str()));
        document.insert("jobInfo".to_string(), Value::Object(job_info));
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_template() {
        let document = JobTemplate::for_kind(JobKind::Run).to_document();
        assert_eq!(
            Value::Object(document),
            json!({"type": "run_app", "state": "pending", "jobInfo": {"appType": "AppStoreApp"}})
        );
    }

    #[test]
    fn test_dioscope_template() {
        let document = JobTemplate::for_kind(JobKind::Dioscope).to_document();
        assert_eq!(
            Value::Object(document),
            json!({"type": "dioscope", "state": "pending", "jobInfo": {"appType": "AppStoreApp"}})
        );
    }

    #[test]
    fn test_document_type_follows_kind() {
        for kind in [JobKind::Run, JobKind::Dioscope] {
            let document = JobTemplate::for_kind(kind).to_document();
            assert_eq!(document["type"], kind.job_type().as_str());
        }
    }

    #[test]
    fn test_documents_are_independent_copies() {
        let template = JobTemplate::for_kind(JobKind::Run);
        let mut first = template.to_document();
        first.insert("state".to_string(), Value::from("mutated"));

        assert_eq!(template.to_document()["state"], "pending");
    }
}
