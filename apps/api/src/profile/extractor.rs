//! Extraction Orchestrator — free text in, `RunnerProfile` out, never an error.
//!
//! Pipeline: one completion call → JSON recovery → per-field normalization →
//! time derivation → missing-field inference. Every failure along the way turns
//! into `RunnerProfile::absent()`.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::llm_client::{ApiKey, CompletionRequest, CompletionService, LlmError};
use crate::profile::models::{Elapsed5k, RunnerProfile};
use crate::profile::normalize::{normalize_age, normalize_display, normalize_seconds, normalize_sex};
use crate::profile::observer::{ExtractionObserver, ExtractionReport, NoopObserver};
use crate::profile::prompts::PROFILE_EXTRACT_SYSTEM;
use crate::profile::recovery::{recover, RecoveryError};
use crate::profile::time_codec::display_to_seconds;

static NULL: Value = Value::Null;

/// Reasons an extraction fell back to the all-absent profile.
/// Internal to the orchestrator and its observers; `extract` never returns one.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("input absent: {0}")]
    InputAbsent(&'static str),

    #[error("completion call failed: {0}")]
    Transport(#[from] LlmError),

    #[error("unrecoverable model reply: {0}")]
    RecoveryFailed(#[from] RecoveryError),
}

/// Shared across request handlers; holds no per-call state.
pub struct Extractor {
    completions: Arc<dyn CompletionService>,
    observer: Arc<dyn ExtractionObserver>,
}

impl Extractor {
    pub fn new(completions: Arc<dyn CompletionService>) -> Self {
        Self {
            completions,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Extracts a runner profile from free text. Total: every failure yields
    /// `RunnerProfile::absent()`.
    pub async fn extract(&self, text: &str, credentials: Option<&ApiKey>) -> RunnerProfile {
        let extraction_id = Uuid::new_v4();

        let (profile, failure) = match self.try_extract(text, credentials).await {
            Ok(profile) => (profile, None),
            Err(ExtractionError::InputAbsent(what)) => {
                debug!(%extraction_id, "Skipping extraction, {what} absent");
                (
                    RunnerProfile::absent(),
                    Some(ExtractionError::InputAbsent(what)),
                )
            }
            Err(e) => {
                warn!(%extraction_id, "Runner profile extraction failed: {e}");
                (RunnerProfile::absent(), Some(e))
            }
        };

        self.observer.observe(&ExtractionReport {
            extraction_id,
            input: text,
            profile: &profile,
            failure: failure.as_ref(),
        });

        profile
    }

    async fn try_extract(
        &self,
        text: &str,
        credentials: Option<&ApiKey>,
    ) -> Result<RunnerProfile, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::InputAbsent("text"));
        }
        let api_key = credentials.ok_or(ExtractionError::InputAbsent("credentials"))?;

        let request = CompletionRequest {
            system: PROFILE_EXTRACT_SYSTEM,
            user: text,
            temperature: 0.0,
            json_object: true,
        };
        let reply = self.completions.complete(request, api_key).await?;

        let raw = recover(&reply)?;
        Ok(profile_from_raw(&raw))
    }
}

/// Builds a profile from a recovered model object. Any `missing` key in `raw` is ignored.
pub fn profile_from_raw(raw: &Map<String, Value>) -> RunnerProfile {
    let sex = normalize_sex(field(raw, "sex"));
    let age = normalize_age(field(raw, "age"));

    // Explicit seconds win; otherwise decode the display string.
    let seconds = normalize_seconds(field(raw, "t5k_s")).or_else(|| {
        normalize_display(field(raw, "t5k")).and_then(|display| display_to_seconds(&display))
    });

    RunnerProfile::new(sex, age, seconds.map(Elapsed5k::from_seconds))
}

fn field<'a>(raw: &'a Map<String, Value>, key: &str) -> &'a Value {
    raw.get(key).unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::profile::models::{ProfileField, Sex};

    enum Reply {
        Text(&'static str),
        Status(u16),
    }

    struct StubCompletions {
        reply: Reply,
        calls: AtomicUsize,
        last_request: Mutex<Option<(String, String, f32, bool)>>,
    }

    impl StubCompletions {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionService for StubCompletions {
        async fn complete(
            &self,
            request: CompletionRequest<'_>,
            _api_key: &ApiKey,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((
                request.system.to_string(),
                request.user.to_string(),
                request.temperature,
                request.json_object,
            ));
            match &self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Status(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream failure".to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        reports: Mutex<Vec<(String, RunnerProfile, bool)>>,
    }

    impl ExtractionObserver for RecordingObserver {
        fn observe(&self, report: &ExtractionReport<'_>) {
            self.reports.lock().unwrap().push((
                report.input.to_string(),
                report.profile.clone(),
                report.failure.is_some(),
            ));
        }
    }

    fn key() -> ApiKey {
        ApiKey::new("sk-test").unwrap()
    }

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_text_returns_absent_without_call() {
        let stub = StubCompletions::new(Reply::Text("{}"));
        let extractor = Extractor::new(stub.clone());

        let profile = extractor.extract("   \n", Some(&key())).await;

        assert_eq!(profile, RunnerProfile::absent());
        assert_eq!(
            serde_json::to_value(&profile).unwrap()["missing"],
            json!(["sex", "age", "t5k"])
        );
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_returns_absent_without_call() {
        let stub = StubCompletions::new(Reply::Text(r#"{"sex":"M"}"#));
        let extractor = Extractor::new(stub.clone());

        let profile = extractor.extract("Mam 40 lat", None).await;

        assert_eq!(profile, RunnerProfile::absent());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_error_returns_absent() {
        let stub = StubCompletions::new(Reply::Status(401));
        let extractor = Extractor::new(stub.clone());

        let profile = extractor.extract("Jestem kobietą, 5 km w 24:30", Some(&key())).await;

        assert_eq!(profile, RunnerProfile::absent());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_unrecoverable_reply_returns_absent() {
        let stub = StubCompletions::new(Reply::Text("Sorry, I cannot help with that."));
        let extractor = Extractor::new(stub.clone());

        let profile = extractor.extract("Mam 40 lat", Some(&key())).await;

        assert_eq!(profile, RunnerProfile::absent());
    }

    #[tokio::test]
    async fn test_extract_sends_one_deterministic_request() {
        let stub = StubCompletions::new(Reply::Text(
            r#"{"sex":"K","age":33,"t5k":"24:30","t5k_s":null}"#,
        ));
        let extractor = Extractor::new(stub.clone());
        let text = "Jestem kobietą, mam 33 lata, 5 km biegam w 24:30";

        let profile = extractor.extract(text, Some(&key())).await;

        assert_eq!(stub.calls(), 1);
        let (system, user, temperature, json_object) =
            stub.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(system, PROFILE_EXTRACT_SYSTEM);
        assert_eq!(user, text);
        assert_eq!(temperature, 0.0);
        assert!(json_object);

        assert_eq!(profile.sex(), Sex::Female);
        assert_eq!(profile.age(), Some(33));
        assert_eq!(profile.elapsed_5k().unwrap().display(), "24:30");
        assert!(profile.is_complete());
    }

    #[tokio::test]
    async fn test_reply_wrapped_in_prose_is_recovered() {
        let stub = StubCompletions::new(Reply::Text(
            "Oto wynik:\n```json\n{\"sex\":\"M\",\"age\":\"52\",\"t5k\":\"0:27:15\"}\n```",
        ));
        let extractor = Extractor::new(stub);

        let profile = extractor.extract("facet, 52 lata, 27:15", Some(&key())).await;

        assert_eq!(profile.sex(), Sex::Male);
        assert_eq!(profile.age(), Some(52));
        assert_eq!(profile.elapsed_5k().unwrap().seconds(), 1635.0);
        assert_eq!(profile.elapsed_5k().unwrap().display(), "27:15");
    }

    #[tokio::test]
    async fn test_observer_sees_every_call() {
        let observer = Arc::new(RecordingObserver::default());
        let stub = StubCompletions::new(Reply::Text(r#"{"sex":"M","age":40,"t5k":"25:00"}"#));
        let extractor = Extractor::new(stub).with_observer(observer.clone());

        let ok = extractor.extract("Mam 40 lat", Some(&key())).await;
        let absent = extractor.extract("", Some(&key())).await;

        let reports = observer.reports.lock().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0], ("Mam 40 lat".to_string(), ok, false));
        assert_eq!(reports[1], (String::new(), absent, true));
    }

    #[tokio::test]
    async fn test_end_to_end_through_http_client() {
        use std::time::Duration;

        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use crate::llm_client::LlmClient;

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {
                    "content": "Jasne!\n{\"sex\": \"kobieta\", \"age\": 29.0, \"t5k\": \"26 minut\"}"
                }}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(&server.uri(), "test-model", Duration::from_secs(5)).unwrap();
        let extractor = Extractor::new(Arc::new(client));

        let profile = extractor
            .extract("Kobieta, 29 lat, 5 km w 26 minut", Some(&key()))
            .await;

        assert_eq!(profile.sex(), Sex::Female);
        assert_eq!(profile.age(), Some(29));
        assert_eq!(profile.elapsed_5k().unwrap().display(), "26:00");
        assert!(profile.is_complete());
    }

    #[tokio::test]
    async fn test_unreachable_service_returns_absent() {
        use std::time::Duration;

        use crate::llm_client::LlmClient;

        // Nothing listens on port 9 (discard) in the test environment.
        let client =
            LlmClient::new("http://127.0.0.1:9", "test-model", Duration::from_secs(2)).unwrap();
        let extractor = Extractor::new(Arc::new(client));

        let profile = extractor.extract("Mam 40 lat", Some(&key())).await;

        assert_eq!(profile, RunnerProfile::absent());
    }

    #[test]
    fn test_scenario_seconds_fill_display() {
        let profile = profile_from_raw(&raw(json!({
            "sex": "mężczyzna",
            "age": "40",
            "t5k": null,
            "t5k_s": 1500
        })));

        assert_eq!(profile.sex(), Sex::Male);
        assert_eq!(profile.age(), Some(40));
        let elapsed = profile.elapsed_5k().unwrap();
        assert_eq!(elapsed.seconds(), 1500.0);
        assert_eq!(elapsed.display(), "25:00");
        assert!(profile.missing().is_empty());
    }

    #[test]
    fn test_scenario_colloquial_display_fills_seconds() {
        let profile = profile_from_raw(&raw(json!({
            "sex": "?",
            "age": null,
            "t5k": "25 minut"
        })));

        assert_eq!(profile.sex(), Sex::Unknown);
        assert_eq!(profile.age(), None);
        let elapsed = profile.elapsed_5k().unwrap();
        assert_eq!(elapsed.seconds(), 1500.0);
        assert_eq!(elapsed.display(), "25:00");
        assert_eq!(
            profile.missing(),
            &BTreeSet::from([ProfileField::Sex, ProfileField::Age])
        );
    }

    #[test]
    fn test_reported_missing_list_is_ignored() {
        let profile = profile_from_raw(&raw(json!({
            "sex": "M",
            "age": 40,
            "t5k": "25:00",
            "missing": ["sex", "age", "t5k"]
        })));
        assert!(profile.missing().is_empty());

        let profile = profile_from_raw(&raw(json!({
            "sex": "M",
            "age": "forty-ish",
            "t5k": "fast",
            "missing": []
        })));
        assert_eq!(
            profile.missing(),
            &BTreeSet::from([ProfileField::Age, ProfileField::Elapsed5k])
        );
    }

    #[test]
    fn test_explicit_seconds_win_over_display() {
        let profile = profile_from_raw(&raw(json!({"t5k": "30:00", "t5k_s": 1499.6})));
        let elapsed = profile.elapsed_5k().unwrap();
        assert_eq!(elapsed.seconds(), 1499.6);
        assert_eq!(elapsed.display(), "25:00");
    }

    #[test]
    fn test_unusable_seconds_fall_back_to_display() {
        let profile = profile_from_raw(&raw(json!({"t5k": "24m 10s", "t5k_s": "n/a"})));
        assert_eq!(profile.elapsed_5k().unwrap().seconds(), 1450.0);
    }

    #[test]
    fn test_empty_object_is_all_missing() {
        assert_eq!(profile_from_raw(&Map::new()), RunnerProfile::absent());
    }

    #[test]
    fn test_overflowing_display_time_is_missing() {
        let profile = profile_from_raw(&raw(json!({
            "sex": "M",
            "age": 40,
            "t5k": "307445734561825860m 30s"
        })));

        assert_eq!(profile.sex(), Sex::Male);
        assert_eq!(profile.age(), Some(40));
        assert!(profile.elapsed_5k().is_none());
        assert_eq!(profile.missing(), &BTreeSet::from([ProfileField::Elapsed5k]));
    }

    #[test]
    fn test_extreme_numbers_do_not_panic() {
        let profile = profile_from_raw(&raw(json!({
            "sex": "K",
            "age": 1e300,
            "t5k_s": 1e300
        })));

        assert_eq!(profile.age(), Some(i64::MAX));
        assert!(profile.is_complete());
    }

    #[tokio::test]
    async fn test_overflowing_reply_returns_profile_without_time() {
        let stub = StubCompletions::new(Reply::Text(
            r#"{"sex":"M","age":40,"t5k":"307445734561825860m 30s","t5k_s":null}"#,
        ));
        let extractor = Extractor::new(stub.clone());

        let profile = extractor.extract("Facet, 40 lat", Some(&key())).await;

        assert_eq!(profile.missing(), &BTreeSet::from([ProfileField::Elapsed5k]));
    }
}
