use chrono::{TimeZone, Utc};
use openbis_dto::{
    ApplicationServerApi, ClientConfig, Error, SampleFetchOptions, SampleSearchCriteria, Transport,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

// In-memory stand-in for the application server
struct MockServer {
    token: String,
    calls: Mutex<Vec<Value>>,
}

impl MockServer {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Value> {
        self.calls.lock().clone()
    }

    fn answer(&self, request: &Value) -> Value {
        let result = match request["method"].as_str() {
            Some("login") if request["params"][1] == "secret" => json!(self.token),
            Some("login") => Value::Null,
            Some("logout") => Value::Null,
            Some("searchSamples") if request["params"][0] != json!(self.token) => {
                return json!({
                    "id": request["id"],
                    "jsonrpc": "2.0",
                    "error": {"code": 1, "message": "Session token is invalid"}
                });
            }
            Some("searchSamples") => json!({
                "@type": "as.dto.common.search.SearchResult",
                "objects": [{
                    "@type": "as.dto.sample.Sample",
                    "fetchOptions": request["params"][2],
                    "code": "PLATE-1",
                    "identifier": {"@type": "as.dto.sample.id.SampleIdentifier", "identifier": "/LAB/PLATE-1"},
                    "type": {"@type": "as.dto.sample.SampleType", "code": "PLATE"},
                    "experiment": {
                        "@type": "as.dto.experiment.Experiment",
                        "fetchOptions": request["params"][2]["experiment"],
                        "code": "EXP-1",
                        "project": {"@type": "as.dto.project.Project", "code": "SCREENING"}
                    }
                }],
                "totalCount": 1
            }),
            _ => {
                return json!({
                    "id": request["id"],
                    "jsonrpc": "2.0",
                    "error": {"code": -32601, "message": "Method not found"}
                });
            }
        };
        json!({"id": request["id"], "jsonrpc": "2.0", "result": result})
    }
}

#[async_trait::async_trait]
impl Transport for MockServer {
    async fn post(&self, _endpoint: &str, body: Value) -> anyhow::Result<Value> {
        let response = self.answer(&body);
        self.calls.lock().push(body);
        Ok(response)
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_code_equals_serializes_to_and_root() {
    let mut criteria = SampleSearchCriteria::new();
    criteria.with_code().that_equals("PLATE-1");

    let json = serde_json::to_value(openbis_dto::SearchCriteria::from(criteria)).unwrap();

    assert_eq!(json["@type"], "as.dto.sample.search.SampleSearchCriteria");
    assert_eq!(json["operator"], "AND");
    assert_eq!(json["criteria"].as_array().map(Vec::len), Some(1));

    let child = &json["criteria"][0];
    assert_eq!(child["@type"], "as.dto.common.search.CodeSearchCriteria");
    assert_eq!(child["fieldName"], "code");
    assert_eq!(child["fieldType"], "ATTRIBUTE");
    assert_eq!(
        child["fieldValue"],
        json!({"@type": "as.dto.common.search.StringEqualToValue", "value": "PLATE-1"})
    );
}

#[test]
fn test_fetch_options_type_and_experiment_project() {
    let mut fetch_options = SampleFetchOptions::new();
    fetch_options.with_type();
    fetch_options.with_experiment().with_project();

    assert!(fetch_options.has_type());
    assert!(fetch_options.has_experiment());
    assert!(fetch_options.experiment().unwrap().has_project());
    assert!(!fetch_options.has_space());
    assert!(!fetch_options.has_parents());
}

#[test]
fn test_date_object_uses_object_variant() {
    let instant = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    let mut by_object = SampleSearchCriteria::new();
    by_object.with_registration_date().that_equals(instant).unwrap();
    let mut by_text = SampleSearchCriteria::new();
    by_text.with_registration_date().that_equals("2024-03-01").unwrap();

    let object_json = serde_json::to_value(openbis_dto::SearchCriteria::from(by_object)).unwrap();
    let text_json = serde_json::to_value(openbis_dto::SearchCriteria::from(by_text)).unwrap();

    let object_value = &object_json["criteria"][0]["fieldValue"];
    let text_value = &text_json["criteria"][0]["fieldValue"];
    assert_eq!(object_value["@type"], "as.dto.common.search.DateObjectEqualToValue");
    assert_eq!(object_value["value"], instant.timestamp_millis());
    assert_eq!(text_value["@type"], "as.dto.common.search.DateEqualToValue");
    assert_eq!(text_value["value"], "2024-03-01");
    assert_eq!(
        object_json["criteria"][0]["timeZone"],
        json!({"@type": "as.dto.common.search.ServerTimeZone"})
    );
}

#[test]
fn test_invalid_date_fails_fast() {
    let mut criteria = SampleSearchCriteria::new();
    let err = criteria.with_modification_date().that_is_later_than("abc").unwrap_err();

    assert!(matches!(err, Error::InvalidDateFormat { .. }));
    assert_eq!(
        err.to_string(),
        "modification_date later than 'abc': date is not in any of the accepted formats: \
         YYYY-MM-DD, YYYY-MM-DD HH:mm, YYYY-MM-DD HH:mm:ss"
    );
}

#[tokio::test]
async fn test_search_samples_round_trip() {
    init_logging();
    println!("Starting sample search round trip");

    let api = ApplicationServerApi::new(MockServer::new("admin-token"), &ClientConfig::default());

    // 1. Login
    let token = api.login("admin", "secret").await.unwrap();
    assert_eq!(token, "admin-token");

    // 2. Search with a nested fetch graph
    let mut criteria = SampleSearchCriteria::new();
    criteria.with_or_operator();
    criteria.with_code().that_equals("PLATE-1");
    criteria.with_parents().with_code().that_starts_with("PLATE");

    let mut fetch_options = SampleFetchOptions::new();
    fetch_options.with_type();
    fetch_options.with_experiment().with_project();
    fetch_options.sort_by().code().desc();

    let result = api.search_samples(&criteria, &fetch_options).await.unwrap();
    assert_eq!(result.total_count, 1);

    let sample = &result.objects[0];
    assert_eq!(sample.code.as_deref(), Some("PLATE-1"));
    assert_eq!(
        sample.entity_type().unwrap().and_then(|t| t.code.as_deref()),
        Some("PLATE")
    );
    let experiment = sample.experiment().unwrap().unwrap();
    assert_eq!(
        experiment.project().unwrap().and_then(|p| p.code.as_deref()),
        Some("SCREENING")
    );
    assert!(sample.space().unwrap_err().is_not_fetched());
    assert!(experiment.samples().unwrap_err().is_not_fetched());

    // 3. Check what went over the wire
    let calls = api_calls(&api);
    let params = &calls[1]["params"];
    assert_eq!(calls[1]["method"], "searchSamples");
    assert_eq!(params[0], "admin-token");
    assert_eq!(params[1]["operator"], "OR");
    assert_eq!(params[1]["criteria"][1]["@type"], "as.dto.sample.search.SampleParentsSearchCriteria");
    assert_eq!(params[2]["sort"]["sortings"][0]["field"], "CODE");
    assert!(params[2].get("space").is_none());

    // 4. Logout
    api.logout().await.unwrap();
    assert!(!api.is_logged_in());

    println!("Sample search round trip passed");
}

#[tokio::test]
async fn test_server_error_is_reported() {
    init_logging();

    let api = ApplicationServerApi::new(MockServer::new("admin-token"), &ClientConfig::default());
    api.set_session_token("stale-token");

    let err = api
        .search_samples(&SampleSearchCriteria::new(), &SampleFetchOptions::new())
        .await
        .unwrap_err();
    match err {
        Error::Rpc { code, message } => {
            assert_eq!(code, 1);
            assert_eq!(message, "Session token is invalid");
        }
        other => panic!("expected a server error, got {:?}", other),
    }
}

fn api_calls(api: &ApplicationServerApi<MockServer>) -> Vec<Value> {
    api.transport().calls()
}
