use log::debug;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::rpc::{decode_response, to_wire, RpcRequest};
use crate::api::transport::Transport;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::fetch::*;
use crate::model::*;
use crate::search::*;

/// Client of the application server API.
///
/// Holds the session token obtained by [`login`](Self::login) and passes it
/// as the first parameter of every search.
pub struct ApplicationServerApi<T: Transport> {
    transport: T,
    endpoint: String,
    session_token: RwLock<Option<String>>,
}

impl<T: Transport> ApplicationServerApi<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self::with_endpoint(transport, config.api_url())
    }

    pub fn with_endpoint(transport: T, endpoint: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            session_token: RwLock::new(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session_token(&self) -> Option<String> {
        self.session_token.read().clone()
    }

    /// Reuses a session opened elsewhere.
    pub fn set_session_token(&self, token: impl Into<String>) {
        *self.session_token.write() = Some(token.into());
    }

    pub fn is_logged_in(&self) -> bool {
        self.session_token.read().is_some()
    }

    pub async fn login(&self, user: &str, password: &str) -> Result<String> {
        let token: Option<String> = self
            .call("login", vec![Value::from(user), Value::from(password)])
            .await?;
        match token {
            Some(token) => {
                *self.session_token.write() = Some(token.clone());
                Ok(token)
            }
            None => Err(Error::LoginFailed {
                user: user.to_string(),
            }),
        }
    }

    pub async fn logout(&self) -> Result<()> {
        let token = self.require_session()?;
        self.call::<()>("logout", vec![Value::from(token)]).await?;
        *self.session_token.write() = None;
        Ok(())
    }

    pub async fn search_spaces(
        &self,
        criteria: &SpaceSearchCriteria,
        fetch_options: &SpaceFetchOptions,
    ) -> Result<SearchResult<Space>> {
        self.search("searchSpaces", criteria, fetch_options).await
    }

    pub async fn search_projects(
        &self,
        criteria: &ProjectSearchCriteria,
        fetch_options: &ProjectFetchOptions,
    ) -> Result<SearchResult<Project>> {
        self.search("searchProjects", criteria, fetch_options).await
    }

    pub async fn search_experiments(
        &self,
        criteria: &ExperimentSearchCriteria,
        fetch_options: &ExperimentFetchOptions,
    ) -> Result<SearchResult<Experiment>> {
        self.search("searchExperiments", criteria, fetch_options).await
    }

    pub async fn search_samples(
        &self,
        criteria: &SampleSearchCriteria,
        fetch_options: &SampleFetchOptions,
    ) -> Result<SearchResult<Sample>> {
        self.search("searchSamples", criteria, fetch_options).await
    }

    pub async fn search_data_sets(
        &self,
        criteria: &DataSetSearchCriteria,
        fetch_options: &DataSetFetchOptions,
    ) -> Result<SearchResult<DataSet>> {
        self.search("searchDataSets", criteria, fetch_options).await
    }

    pub async fn search_materials(
        &self,
        criteria: &MaterialSearchCriteria,
        fetch_options: &MaterialFetchOptions,
    ) -> Result<SearchResult<Material>> {
        self.search("searchMaterials", criteria, fetch_options).await
    }

    async fn search<C, F, R>(&self, method: &str, criteria: &C, fetch_options: &F) -> Result<SearchResult<R>>
    where
        C: Criterion + Clone,
        F: Serialize,
        R: DeserializeOwned,
    {
        let token = self.require_session()?;
        let criteria: SearchCriteria = criteria.clone().into();
        debug!("{} where {}", method, criteria);
        let params = vec![Value::from(token), to_wire(&criteria)?, to_wire(fetch_options)?];
        let result: SearchResult<R> = self.call(method, params).await?;
        debug!("{} returned {} of {} objects", method, result.objects.len(), result.total_count);
        Ok(result)
    }

    async fn call<R: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<R> {
        let request = RpcRequest::new(method, params);
        debug!("calling {} (request {})", method, request.id);
        let response = self.transport.post(&self.endpoint, to_wire(&request)?).await?;
        decode_response(method, response)
    }

    fn require_session(&self) -> Result<String> {
        self.session_token.read().clone().ok_or(Error::NoSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::VecDeque;

    /// Replays canned responses and records every request it receives.
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Value>>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedTransport {
        fn with_responses(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl Transport for ScriptedTransport {
        async fn post(&self, endpoint: &str, body: Value) -> anyhow::Result<Value> {
            self.requests.lock().push((endpoint.to_string(), body));
            self.responses
                .lock()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("no scripted response left"))
        }
    }

    fn ok(result: Value) -> Value {
        json!({"id": "1", "jsonrpc": "2.0", "result": result})
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let api = ApplicationServerApi::with_endpoint(
            ScriptedTransport::with_responses(vec![ok(json!("admin-token"))]),
            "https://openbis.test/api",
        );

        let token = api.login("admin", "secret").await.unwrap();
        assert_eq!(token, "admin-token");
        assert!(api.is_logged_in());

        let requests = api.transport.requests.lock();
        assert_eq!(requests[0].0, "https://openbis.test/api");
        assert_eq!(requests[0].1["method"], "login");
        assert_eq!(requests[0].1["params"], json!(["admin", "secret"]));
    }

    #[tokio::test]
    async fn test_rejected_login() {
        let api = ApplicationServerApi::with_endpoint(
            ScriptedTransport::with_responses(vec![ok(Value::Null)]),
            "https://openbis.test/api",
        );

        let err = api.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::LoginFailed { .. }));
        assert!(!api.is_logged_in());
    }

    #[tokio::test]
    async fn test_search_requires_session() {
        let api = ApplicationServerApi::with_endpoint(ScriptedTransport::default(), "https://openbis.test/api");
        let err = api
            .search_samples(&SampleSearchCriteria::new(), &SampleFetchOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoSession));
        assert!(api.transport.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn test_search_sends_typed_criteria() {
        let api = ApplicationServerApi::with_endpoint(
            ScriptedTransport::with_responses(vec![ok(json!({
                "@type": "as.dto.common.search.SearchResult",
                "objects": [{"@type": "as.dto.space.Space", "code": "LAB"}],
                "totalCount": 1
            }))]),
            "https://openbis.test/api",
        );
        api.set_session_token("token-1");

        let mut criteria = SpaceSearchCriteria::new();
        criteria.with_code().that_equals("LAB");
        let result = api.search_spaces(&criteria, &SpaceFetchOptions::new()).await.unwrap();

        assert_eq!(result.total_count, 1);
        assert_eq!(result.objects[0].code.as_deref(), Some("LAB"));

        let requests = api.transport.requests.lock();
        let params = &requests[0].1["params"];
        assert_eq!(params[0], "token-1");
        assert_eq!(params[1]["@type"], "as.dto.space.search.SpaceSearchCriteria");
        assert_eq!(params[2]["@type"], "as.dto.space.fetchoptions.SpaceFetchOptions");
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        let api = ApplicationServerApi::with_endpoint(ScriptedTransport::default(), "https://openbis.test/api");
        api.set_session_token("token-1");

        let err = api.logout().await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert!(api.is_logged_in());
    }
}
