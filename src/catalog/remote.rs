use async_trait::async_trait;
use log::{ debug, error };
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::query::{ paginate, ProductQuery };
use super::{ CatalogError, CatalogSource };
use crate::config::endpoints::Endpoints;
use crate::models::catalog::{
    ApiEnvelope,
    Article,
    Category,
    HomepageData,
    Product,
    ProductPage,
    Settings,
};

/// Read-only client for the PHP catalog backend.
pub struct RemoteCatalog {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl RemoteCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let endpoints = Endpoints::from_base(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(RemoteCatalog { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, String)]
    ) -> Result<ApiEnvelope<T>, CatalogError> {
        debug!("GET {} {:?}", url, params);
        let resp = self.client
            .get(url.clone())
            .query(params)
            .header(ACCEPT, "application/json")
            .send().await
            .map_err(|e| {
                error!("Catalog request to {} failed: {}", url, e);
                CatalogError::Http(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            error!("Catalog endpoint {} returned {}", url, status);
            return Err(CatalogError::Status { status, url: url.to_string() });
        }

        resp.json::<ApiEnvelope<T>>().await.map_err(|e| {
            error!("Undecodable catalog payload from {}: {}", url, e);
            CatalogError::Http(e)
        })
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, String)]
    ) -> Result<T, CatalogError> {
        self.get_envelope(url, params).await?
            .data
            .ok_or_else(|| CatalogError::EmptyResponse(url.to_string()))
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn homepage(&self) -> Result<HomepageData, CatalogError> {
        self.get_data(&self.endpoints.homepage, &[]).await
    }

    async fn products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        let envelope: ApiEnvelope<Vec<Product>> = self.get_envelope(
            &self.endpoints.products,
            &query.to_params()
        ).await?;
        let data = envelope.data.ok_or_else(||
            CatalogError::EmptyResponse(self.endpoints.products.to_string())
        )?;
        let meta = envelope.meta.unwrap_or_else(||
            paginate(data.len() as u64, query.page(), query.limit())
        );
        Ok(ProductPage { data, meta })
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Product, CatalogError> {
        let params = [
            ("action", "detail".to_string()),
            ("slug", slug.to_string()),
        ];
        match self.get_data(&self.endpoints.products, &params).await {
            Err(CatalogError::EmptyResponse(_)) => Err(CatalogError::NotFound(slug.to_string())),
            Err(CatalogError::Status { status: StatusCode::NOT_FOUND, .. }) => {
                Err(CatalogError::NotFound(slug.to_string()))
            }
            other => other,
        }
    }

    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.get_data(&self.endpoints.categories, &[]).await
    }

    async fn settings(&self) -> Result<Settings, CatalogError> {
        self.get_data(&self.endpoints.settings, &[]).await
    }

    /// The backend has no article endpoint; articles are the homepage's
    /// inspirations.
    async fn articles(&self) -> Result<Vec<Article>, CatalogError> {
        Ok(self.homepage().await?.inspirations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoints_from_base() {
        let remote = RemoteCatalog::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
        assert_eq!(remote.endpoints().settings.as_str(), "http://127.0.0.1:9/api/settings.php");
    }

    #[test]
    fn invalid_base_is_rejected() {
        let err = RemoteCatalog::new("not a url", Duration::from_secs(1)).err().unwrap();
        assert!(matches!(err, CatalogError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_http_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let base = format!("http://127.0.0.1:{}/api", port);
        let remote = RemoteCatalog::new(&base, Duration::from_secs(2)).unwrap();
        let err = remote.categories().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
