//! Wire types exchanged with the query service.
//!
//! The service answers with a loosely shaped JSON object. Every field the
//! client knows about is modelled as an explicit `Option`, so presence is
//! decided once at decode time and the dispatcher never inspects raw keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a tabular result: column name to scalar (or explicit null).
///
/// Key insertion order is preserved, which is what the table header order
/// is derived from.
pub type RowRecord = Map<String, Value>;

/// Request body for the query endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Database locator (connection string) the service should query.
    pub database_url: String,
    /// Natural-language prompt.
    pub prompt: String,
}

/// The query the service derived from the prompt.
///
/// SQL back ends produce a string; document stores produce a structured
/// filter object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneratedQuery {
    Text(String),
    Structured(Value),
}

impl GeneratedQuery {
    /// Returns the query as display text.
    ///
    /// Structured values are pretty-printed with two-space indentation.
    pub fn to_display_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// The service's own classification of the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub database_type: String,
    #[serde(default)]
    pub database_name: String,
    #[serde(default, rename = "isEmailRequired")]
    pub email_required: bool,
    #[serde(default, rename = "isReportGenerationRequired")]
    pub report_required: bool,
    #[serde(default, rename = "isVisualizationRequired")]
    pub visualization_required: bool,
}

impl Analysis {
    /// Short label such as `sql/postgresql` for headers.
    pub fn label(&self) -> String {
        match (self.database_type.is_empty(), self.database_name.is_empty()) {
            (true, true) => "unknown".to_string(),
            (false, true) => self.database_type.to_lowercase(),
            (true, false) => self.database_name.to_lowercase(),
            (false, false) => format!(
                "{}/{}",
                self.database_type.to_lowercase(),
                self.database_name.to_lowercase()
            ),
        }
    }
}

/// A successful response from the query service.
///
/// All fields are independent. JSON `null` decodes as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    #[serde(default, alias = "emailStatus", skip_serializing_if = "Option::is_none")]
    pub email_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,

    /// Chart configuration, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<Value>,

    #[serde(default, alias = "queryResult", skip_serializing_if = "Option::is_none")]
    pub query_result: Option<Vec<RowRecord>>,

    #[serde(
        default,
        alias = "generatedQuery",
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_query: Option<GeneratedQuery>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_connection_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_fetching_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_execution_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_result_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_status: Option<String>,
}

impl ResponsePayload {
    /// Decodes a payload from a JSON body.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Service-side diagnostics in display order, as `(label, message)`.
    pub fn diagnostics(&self) -> Vec<(&'static str, &str)> {
        [
            ("Database connection", &self.database_connection_error),
            ("Schema fetching", &self.schema_fetching_error),
            ("Query execution", &self.query_execution_error),
            ("Query result", &self.query_result_message),
            ("Report", &self.report_status),
            ("Visualization", &self.visual_status),
        ]
        .into_iter()
        .filter_map(|(label, message)| message.as_deref().map(|m| (label, m)))
        .collect()
    }
}

/// Body of a non-success response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

/// The `detail` field of an error body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Plain message, used verbatim.
    Message(String),
    /// Router-level failure carrying the query that broke.
    Structured {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        detail: Option<String>,
        #[serde(default)]
        generated_query_that_failed: Option<GeneratedQuery>,
    },
    /// Anything else, e.g. a list of request validation problems.
    Other(Value),
}

impl ErrorDetail {
    /// Returns the human-readable message, if one can be extracted.
    ///
    /// Blank messages count as absent.
    pub fn message(&self) -> Option<String> {
        let message = match self {
            Self::Message(msg) => Some(msg.clone()),
            Self::Structured { error, detail, .. } => match (non_blank(error), non_blank(detail)) {
                (Some(error), Some(detail)) => {
                    Some(format!("{}: {detail}", error.trim_end_matches('.')))
                }
                (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
                (None, None) => None,
            },
            Self::Other(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    Some(Value::Array(items.clone()).to_string())
                } else {
                    Some(messages.join("; "))
                }
            }
            Self::Other(Value::Null) => None,
            Self::Other(value) => Some(value.to_string()),
        };
        message.filter(|m| !m.trim().is_empty())
    }

    /// Returns the query that failed, when the service reported one.
    pub fn failed_query(&self) -> Option<&GeneratedQuery> {
        match self {
            Self::Structured {
                generated_query_that_failed,
                ..
            } => generated_query_that_failed.as_ref(),
            _ => None,
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_snake_case_fields() {
        let payload = ResponsePayload::from_json(
            r##"{"email_status":"sent","report":"# Hi","query_result":[],"generated_query":"SELECT 1"}"##,
        )
        .unwrap();

        assert_eq!(payload.email_status.as_deref(), Some("sent"));
        assert_eq!(payload.report.as_deref(), Some("# Hi"));
        assert_eq!(payload.query_result, Some(vec![]));
        assert_eq!(
            payload.generated_query,
            Some(GeneratedQuery::Text("SELECT 1".to_string()))
        );
        assert!(payload.visual.is_none());
    }

    #[test]
    fn test_decode_camel_case_aliases() {
        let payload = ResponsePayload::from_json(
            r#"{"emailStatus":"ok","queryResult":[{"id":1}],"generatedQuery":{"op":"select"}}"#,
        )
        .unwrap();

        assert_eq!(payload.email_status.as_deref(), Some("ok"));
        assert_eq!(payload.query_result.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            payload.generated_query,
            Some(GeneratedQuery::Structured(json!({"op": "select"})))
        );
    }

    #[test]
    fn test_null_fields_are_absent() {
        let payload =
            ResponsePayload::from_json(r#"{"report":null,"visual":null,"query_result":null}"#)
                .unwrap();
        assert_eq!(payload, ResponsePayload::default());
    }

    #[test]
    fn test_empty_string_is_present() {
        let payload = ResponsePayload::from_json(r#"{"email_status":""}"#).unwrap();
        assert_eq!(payload.email_status.as_deref(), Some(""));
    }

    #[test]
    fn test_row_key_order_is_preserved() {
        let payload =
            ResponsePayload::from_json(r#"{"query_result":[{"zeta":1,"alpha":2,"mid":3}]}"#)
                .unwrap();
        let rows = payload.query_result.unwrap();
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_structured_query_pretty_prints() {
        let query = GeneratedQuery::Structured(json!({"collection": "users", "query": {"age": 3}}));
        assert_eq!(
            query.to_display_string(),
            "{\n  \"collection\": \"users\",\n  \"query\": {\n    \"age\": 3\n  }\n}"
        );
    }

    #[test]
    fn test_analysis_label() {
        let payload = ResponsePayload::from_json(
            r#"{"analysis":{"database_type":"SQL","database_name":"PostgreSQL","isEmailRequired":true}}"#,
        )
        .unwrap();
        let analysis = payload.analysis.unwrap();
        assert_eq!(analysis.label(), "sql/postgresql");
        assert!(analysis.email_required);
        assert!(!analysis.visualization_required);
    }

    #[test]
    fn test_diagnostics_in_fixed_order() {
        let payload = ResponsePayload {
            query_execution_error: Some("syntax error".to_string()),
            database_connection_error: Some("refused".to_string()),
            ..Default::default()
        };
        assert_eq!(
            payload.diagnostics(),
            vec![
                ("Database connection", "refused"),
                ("Query execution", "syntax error")
            ]
        );
    }

    #[test]
    fn test_error_detail_string() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"bad locator"}"#).unwrap();
        assert_eq!(
            body.detail.and_then(|d| d.message()),
            Some("bad locator".to_string())
        );
    }

    #[test]
    fn test_error_detail_structured() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"detail":{"error":"Unexpected failure","detail":"boom","generated_query_that_failed":"SELECT x"}}"#,
        )
        .unwrap();
        let detail = body.detail.unwrap();
        assert_eq!(
            detail.message(),
            Some("Unexpected failure: boom".to_string())
        );
        assert_eq!(
            detail.failed_query(),
            Some(&GeneratedQuery::Text("SELECT x".to_string()))
        );
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["body","prompt"],"msg":"field required"}]}"#,
        )
        .unwrap();
        assert_eq!(
            body.detail.and_then(|d| d.message()),
            Some("field required".to_string())
        );
    }

    #[test]
    fn test_error_body_without_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"x"}"#).unwrap();
        assert!(body.detail.is_none());
    }
}
