use log::{trace, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::api::references::resolve_references;
use crate::error::{Error, Result};

pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<Value>,
    pub id: String,
    pub jsonrpc: &'static str,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            params,
            id: Uuid::new_v4().to_string(),
            jsonrpc: JSONRPC_VERSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct RpcResponse {
    /// `Some(Value::Null)` for an explicit `"result": null`, `None` when absent.
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Converts a request argument into its wire JSON.
pub fn to_wire<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Extracts the typed result of a response, or the server's error.
///
/// Back-references to objects already sent earlier in the same result are
/// expanded before the result is decoded.
pub fn decode_response<T: DeserializeOwned>(method: &str, response: Value) -> Result<T> {
    let response: RpcResponse = serde_json::from_value(response)?;
    if let Some(error) = response.error {
        warn!("{} failed with server error {}: {}", method, error.code, error.message);
        return Err(Error::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    match response.result {
        Some(result) => {
            trace!("decoding result of {}", method);
            Ok(serde_json::from_value(resolve_references(result))?)
        }
        None => Err(Error::MissingResult),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Sample, SearchResult};
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let request = RpcRequest::new("searchSamples", vec![json!("token"), json!({}), json!({})]);
        let json = to_wire(&request).unwrap();

        assert_eq!(json["method"], "searchSamples");
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["params"].as_array().map(Vec::len), Some(3));
        assert!(Uuid::parse_str(json["id"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let first = RpcRequest::new("logout", vec![]);
        let second = RpcRequest::new("logout", vec![]);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_decode_result() {
        let token: String = decode_response(
            "login",
            json!({"id": "1", "jsonrpc": "2.0", "result": "admin-240301-token"}),
        )
        .unwrap();
        assert_eq!(token, "admin-240301-token");
    }

    #[test]
    fn test_decode_null_result() {
        let result = decode_response::<()>("logout", json!({"id": "1", "jsonrpc": "2.0", "result": null}));
        assert!(result.is_ok());
    }

    #[test]
    fn test_decode_error() {
        let err = decode_response::<Value>(
            "searchSamples",
            json!({"id": "1", "jsonrpc": "2.0", "error": {"code": 1, "message": "Session no longer valid"}}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Rpc { code: 1, .. }));
        assert_eq!(err.to_string(), "server error 1: Session no longer valid");
    }

    #[test]
    fn test_decode_result_with_back_references() {
        let page: SearchResult<Sample> = decode_response(
            "searchSamples",
            json!({"id": "1", "jsonrpc": "2.0", "result": {
                "@type": "as.dto.common.search.SearchResult",
                "@id": 1,
                "objects": [
                    {
                        "@type": "as.dto.sample.Sample",
                        "@id": 2,
                        "fetchOptions": {
                            "@type": "as.dto.sample.fetchoptions.SampleFetchOptions",
                            "@id": 3,
                            "registrator": {"@type": "as.dto.person.fetchoptions.PersonFetchOptions", "@id": 4}
                        },
                        "code": "PLATE-1",
                        "registrator": {"@type": "as.dto.person.Person", "@id": 5, "userId": "admin"}
                    },
                    {
                        "@type": "as.dto.sample.Sample",
                        "@id": 6,
                        "fetchOptions": 3,
                        "code": "PLATE-2",
                        "registrator": 5
                    }
                ],
                "totalCount": 2
            }}),
        )
        .unwrap();

        assert_eq!(page.total_count, 2);
        let second = &page.objects[1];
        assert_eq!(second.code.as_deref(), Some("PLATE-2"));
        assert!(second.fetch_options().is_some_and(|options| options.has_registrator()));
        assert_eq!(
            second.registrator().unwrap().and_then(|person| person.user_id.as_deref()),
            Some("admin")
        );
    }

    #[test]
    fn test_decode_missing_result() {
        let err = decode_response::<Value>("searchSamples", json!({"id": "1", "jsonrpc": "2.0"})).unwrap_err();
        assert!(matches!(err, Error::MissingResult));
    }
}
