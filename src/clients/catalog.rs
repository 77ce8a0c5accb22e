//! Client for the catalog backend: customer lookup, product search and the
//! full product record the pricing resolver consumes.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::{ClientError, ensure_success};
use crate::pricing::catalog::CatalogProduct;

pub const PRODUCT_SEARCH_LIMIT: u32 = 10;

#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerSuggestion {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    #[serde(default, alias = "_id", deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductSuggestion {
    #[serde(alias = "_id", deserialize_with = "required_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
}

#[derive(Deserialize)]
struct CustomerSearchResponse {
    #[serde(default)]
    suggestions: Vec<CustomerSuggestion>,
}

#[derive(Deserialize)]
struct CustomerDetailResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<CustomerRecord>,
}

#[derive(Deserialize)]
struct ProductSearchResponse {
    #[serde(default)]
    data: Vec<ProductSuggestion>,
}

/// `/single-product/:id` has been seen both bare and wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductDetailResponse {
    Wrapped { data: CatalogProduct },
    Bare(CatalogProduct),
}

fn id_from_value(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(id_from_value(serde_json::Value::deserialize(deserializer)?))
}

fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(serde_json::Value::deserialize(deserializer)?)
        .ok_or_else(|| serde::de::Error::custom("expected string or number id"))
}

impl CatalogClient {
    /// * `base_url` - catalog API root, e.g. `https://api.example.com`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /search-user?name=<term>`
    pub async fn search_customers(&self, name: &str) -> Result<Vec<CustomerSuggestion>, ClientError> {
        let response = self
            .client
            .get(format!("{}/search-user", self.base_url))
            .query(&[("name", name)])
            .send()
            .await?;
        let body: CustomerSearchResponse = ensure_success(response).await?.json().await?;
        Ok(body.suggestions)
    }

    /// `GET /auth/users?search=<email>` with the caller's token forwarded in
    /// the `auth-token` header. Returns the first matching user.
    pub async fn customer_detail(
        &self,
        email: &str,
        auth_token: &str,
    ) -> Result<Option<CustomerRecord>, ClientError> {
        let response = self
            .client
            .get(format!("{}/auth/users", self.base_url))
            .query(&[("search", email)])
            .header("auth-token", auth_token)
            .send()
            .await?;
        let body: CustomerDetailResponse = ensure_success(response).await?.json().await?;
        if !body.success {
            return Err(ClientError::Unexpected(
                "customer lookup reported failure".to_string(),
            ));
        }
        Ok(body.data.into_iter().next())
    }

    /// `GET /search-suggestion?q=<term>&limit=10`
    pub async fn search_products(&self, term: &str) -> Result<Vec<ProductSuggestion>, ClientError> {
        let limit = PRODUCT_SEARCH_LIMIT.to_string();
        let response = self
            .client
            .get(format!("{}/search-suggestion", self.base_url))
            .query(&[("q", term), ("limit", limit.as_str())])
            .send()
            .await?;
        let body: ProductSearchResponse = ensure_success(response).await?.json().await?;
        Ok(body.data)
    }

    /// `GET /single-product/:id`. The id is a single percent-encoded path
    /// segment, so `/`, `?` or `..` in it cannot reach another endpoint.
    pub async fn product_detail(&self, id: &str) -> Result<CatalogProduct, ClientError> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(ClientError::Unexpected(format!("invalid product id {id:?}")));
        }
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::Unexpected(format!("invalid catalog url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Unexpected("catalog url cannot take a path".to_string()))?
            .pop_if_empty()
            .push("single-product")
            .push(id);

        let response = self.client.get(url).send().await?;
        let body: ProductDetailResponse = ensure_success(response).await?.json().await?;
        Ok(match body {
            ProductDetailResponse::Wrapped { data } => data,
            ProductDetailResponse::Bare(product) => product,
        })
    }
}
