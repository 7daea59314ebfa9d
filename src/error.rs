use reqwest::StatusCode;
use sqlx::Error as SqlxError;
use std::io::Write;
use std::time::Duration;
use thiserror::Error as ThisError;
use url::Url;

#[derive(Debug, ThisError)]
pub enum InspectError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("unsupported URL scheme `{scheme}` in {url}")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("database connection failed: {0}")]
    DbConnect(#[source] SqlxError),

    #[error("database connection timed out after {0:?}")]
    DbConnectTimeout(Duration),

    #[error("database query failed: {0}")]
    Database(#[from] SqlxError),

    #[error("connection refused by {url}: {source}")]
    ConnectionRefused {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out: {source}")]
    Timeout {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("{url} responded with status {status}: {body}")]
    UpstreamStatus {
        url: Url,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected response body from {url}: {source}")]
    UnexpectedBody {
        url: Url,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} is missing `{field}`")]
    MissingField { url: Url, field: &'static str },

    #[error("purchase was not accepted: {body}")]
    PurchaseRejected { body: serde_json::Value },

    #[error("TOTAL_AMT mismatch: expected {expected}, server returned {actual}")]
    TotalMismatch { expected: i64, actual: i64 },

    #[error("TOTAL_AMT mismatch: PRICE x quantity overflows i64, server returned {actual}")]
    TotalOverflow { actual: i64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InspectError {
    /// Classify a transport failure for `url`.
    pub fn from_request(url: &Url, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            InspectError::Timeout {
                url: url.clone(),
                source,
            }
        } else if source.is_connect() {
            InspectError::ConnectionRefused {
                url: url.clone(),
                source,
            }
        } else {
            InspectError::Reqwest(source)
        }
    }

    /// Operator-facing follow-up printed under the error line.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            InspectError::Config(_) => Some("check the DB_* / API_* environment variables"),
            InspectError::UrlParse(_) | InspectError::UnsupportedScheme { .. } => {
                Some("API_URL must start with http:// or https://")
            }
            InspectError::DbConnect(_) | InspectError::DbConnectTimeout(_) => {
                Some("check DB_HOST / DB_USER / DB_PASSWORD and that the server accepts TLS")
            }
            InspectError::ConnectionRefused { .. } => {
                Some("the backend server may not be running")
            }
            InspectError::Timeout { .. } => Some("raise API_TIMEOUT_SECS or check the network"),
            InspectError::UpstreamStatus { status, .. } if *status == StatusCode::NOT_FOUND => {
                Some("the product code may not be registered in product_master")
            }
            InspectError::TotalMismatch { .. } | InspectError::TotalOverflow { .. } => {
                Some("TOTAL_AMT should equal the sum of PRICE x quantity over all lines")
            }
            _ => None,
        }
    }

    /// Short label for the failure family, used as the first word of the diagnostic.
    pub fn label(&self) -> &'static str {
        match self {
            InspectError::Config(_)
            | InspectError::UrlParse(_)
            | InspectError::UnsupportedScheme { .. } => "configuration error",
            InspectError::DbConnect(_) | InspectError::DbConnectTimeout(_) => {
                "database connection error"
            }
            InspectError::Database(_) => "database query error",
            InspectError::ConnectionRefused { .. } => "connection error",
            InspectError::Timeout { .. } => "timeout error",
            InspectError::UpstreamStatus { .. } => "HTTP status error",
            InspectError::UnexpectedBody { .. }
            | InspectError::MissingField { .. }
            | InspectError::Json(_) => "unexpected response",
            InspectError::PurchaseRejected { .. }
            | InspectError::TotalMismatch { .. }
            | InspectError::TotalOverflow { .. } => "purchase check failed",
            InspectError::Reqwest(_) => "request error",
            InspectError::Io(_) => "output error",
        }
    }

    /// Render the diagnostic block the binaries print on failure.
    pub fn write_diagnostic(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "❌ {}: {}", self.label(), self)?;
        if let Some(hint) = self.hint() {
            writeln!(out, "💡 {hint}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_carry_hint_for_unknown_product() {
        let err = InspectError::UpstreamStatus {
            url: Url::parse("http://localhost:8000/api/v1/products/0").unwrap(),
            status: StatusCode::NOT_FOUND,
            body: "{\"detail\":\"not found\"}".to_string(),
        };
        assert_eq!(err.label(), "HTTP status error");
        assert!(err.hint().is_some());

        let mut out = Vec::new();
        err.write_diagnostic(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("404"));
        assert!(text.contains("not found"));
    }

    #[test]
    fn total_mismatch_renders_both_amounts() {
        let err = InspectError::TotalMismatch {
            expected: 500,
            actual: 550,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("500"));
        assert!(rendered.contains("550"));
    }

    #[test]
    fn total_overflow_is_a_purchase_check_failure() {
        let err = InspectError::TotalOverflow { actual: 0 };
        assert_eq!(err.label(), "purchase check failed");
        assert!(err.hint().is_some());
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn server_errors_have_no_hint() {
        let err = InspectError::UpstreamStatus {
            url: Url::parse("http://localhost:8000/api/v1/purchase").unwrap(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(err.hint().is_none());
    }
}
