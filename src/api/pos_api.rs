use crate::config::{ApiConfig, BaseUrlSource};
use crate::error::InspectError;
use crate::types::{Product, PurchaseReceipt, PurchaseRequest, PurchaseResponse};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

pub const PRODUCTS_PATH: &str = "/api/v1/products";
pub const PURCHASE_PATH: &str = "/api/v1/purchase";

/// Thin client over the two POS endpoints. No retries: every call is attempted once.
#[derive(Debug, Clone)]
pub struct PosApi {
    client: reqwest::Client,
    base_url: String,
    source: BaseUrlSource,
}

impl PosApi {
    pub fn new(cfg: &ApiConfig) -> Result<Self, InspectError> {
        let (base_url, source) = cfg.base_url();
        // Reject garbage up front instead of on the first request.
        // `localhost:8000` parses too, with `localhost` as the scheme.
        let parsed = Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(InspectError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
                url: base_url,
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .user_agent(concat!("pos-inspect/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(cfg.timeout())
            .danger_accept_invalid_certs(cfg.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url,
            source,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn base_url_source(&self) -> BaseUrlSource {
        self.source
    }

    pub fn product_url(&self, code: &str) -> Result<Url, InspectError> {
        Ok(Url::parse(&format!("{}{PRODUCTS_PATH}/{code}", self.base_url))?)
    }

    pub fn purchase_url(&self) -> Result<Url, InspectError> {
        Ok(Url::parse(&format!("{}{PURCHASE_PATH}", self.base_url))?)
    }

    /// `GET /api/v1/products/{code}`.
    pub async fn get_product(&self, code: &str) -> Result<Product, InspectError> {
        let url = self.product_url(code)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| InspectError::from_request(&url, e))?;
        Self::decode(&url, resp).await
    }

    /// `POST /api/v1/purchase`. `success=false` is reported as
    /// [`InspectError::PurchaseRejected`]; a successful body must carry both
    /// `TOTAL_AMT` and `TRD_ID`.
    pub async fn purchase(&self, req: &PurchaseRequest) -> Result<PurchaseReceipt, InspectError> {
        let url = self.purchase_url()?;
        debug!(body = %serde_json::to_string(req)?, "purchase request");
        let resp = self
            .client
            .post(url.clone())
            .json(req)
            .send()
            .await
            .map_err(|e| InspectError::from_request(&url, e))?;
        let value: serde_json::Value = Self::decode(&url, resp).await?;
        let parsed: PurchaseResponse =
            serde_json::from_value(value.clone()).map_err(|source| InspectError::UnexpectedBody {
                url: url.clone(),
                source,
            })?;

        if !parsed.success {
            return Err(InspectError::PurchaseRejected { body: value });
        }
        let total_amt = parsed.total_amt.ok_or_else(|| InspectError::MissingField {
            url: url.clone(),
            field: "TOTAL_AMT",
        })?;
        let trd_id = parsed.trd_id.ok_or_else(|| InspectError::MissingField {
            url: url.clone(),
            field: "TRD_ID",
        })?;
        Ok(PurchaseReceipt { total_amt, trd_id })
    }

    async fn decode<T>(url: &Url, resp: reqwest::Response) -> Result<T, InspectError>
    where
        T: DeserializeOwned,
    {
        let status = resp.status();
        info!(url = %url, status = %status, "response received");
        debug!(headers = ?resp.headers(), "response headers");

        let body = resp
            .text()
            .await
            .map_err(|e| InspectError::from_request(url, e))?;
        if !status.is_success() {
            return Err(InspectError::UpstreamStatus {
                url: url.clone(),
                status,
                body,
            });
        }
        debug!(body = %body, "response body");
        serde_json::from_str(&body).map_err(|source| InspectError::UnexpectedBody {
            url: url.clone(),
            source,
        })
    }
}
