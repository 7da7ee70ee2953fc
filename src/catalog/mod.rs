pub mod fallback;
pub mod query;
pub mod remote;
pub mod service;

use async_trait::async_trait;
use log::{ info, warn };
use serde::{ Serialize, Deserialize };
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock as TokioRwLock;

use crate::models::catalog::{ Article, Category, HomepageData, Product, ProductPage, Settings };
use self::query::ProductQuery;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog endpoint {url} returned {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("catalog endpoint {0} returned no data")]
    EmptyResponse(String),
    #[error("'{0}' not found")]
    NotFound(String),
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("fallback data IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fallback data JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What the chat responder reads: products, categories and site settings as
/// currently held by the service.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub settings: Settings,
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn homepage(&self) -> Result<HomepageData, CatalogError>;

    async fn products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError>;

    async fn product_by_slug(&self, slug: &str) -> Result<Product, CatalogError>;

    async fn categories(&self) -> Result<Vec<Category>, CatalogError>;

    async fn settings(&self) -> Result<Settings, CatalogError>;

    async fn articles(&self) -> Result<Vec<Article>, CatalogError>;

    async fn article_by_slug(&self, slug: &str) -> Result<Article, CatalogError> {
        self.articles().await?
            .into_iter()
            .find(|a| a.slug == slug)
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))
    }
}

async fn optional<T>(
    request: impl Future<Output = Result<T, CatalogError>>
) -> Result<Option<T>, CatalogError> {
    match request.await {
        Ok(value) => Ok(Some(value)),
        Err(CatalogError::EmptyResponse(url)) => {
            warn!("No data from {}, keeping previous values", url);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Fetches homepage, products and categories concurrently and overlays them
/// on `current`. Any transport failure aborts the whole load so the caller
/// keeps the snapshot it already has.
pub async fn fetch_snapshot(
    source: &dyn CatalogSource,
    current: &CatalogSnapshot
) -> Result<CatalogSnapshot, CatalogError> {
    let all = ProductQuery::default();
    let (homepage, products, categories) = tokio::try_join!(
        optional(source.homepage()),
        optional(source.products(&all)),
        optional(source.categories())
    )?;

    let mut next = current.clone();
    if let Some(homepage) = homepage {
        next.settings = homepage.settings;
        next.categories = homepage.categories;
    }
    if let Some(page) = products {
        next.products = page.data;
    }
    if let Some(categories) = categories {
        next.categories = categories;
    }
    Ok(next)
}

/// Snapshot shared between connections. Readers take the inner `Arc` and
/// drop the lock; refreshes swap it wholesale.
#[derive(Clone)]
pub struct SharedCatalog {
    inner: Arc<TokioRwLock<Arc<CatalogSnapshot>>>,
}

impl SharedCatalog {
    pub fn new(initial: CatalogSnapshot) -> Self {
        Self {
            inner: Arc::new(TokioRwLock::new(Arc::new(initial))),
        }
    }

    pub async fn current(&self) -> Arc<CatalogSnapshot> {
        Arc::clone(&*self.inner.read().await)
    }

    pub async fn replace(&self, next: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let next = Arc::new(next);
        *self.inner.write().await = Arc::clone(&next);
        next
    }

    pub async fn refresh_from(
        &self,
        source: &dyn CatalogSource
    ) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let current = self.current().await;
        match fetch_snapshot(source, &current).await {
            Ok(next) => {
                info!(
                    "Catalog snapshot refreshed from {}: {} products, {} categories",
                    source.name(),
                    next.products.len(),
                    next.categories.len()
                );
                Ok(self.replace(next).await)
            }
            Err(e) => {
                warn!("Catalog refresh from {} failed, keeping current data: {}", source.name(), e);
                Err(e)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::StubSource;
    use super::*;

    fn named(name: &str) -> Product {
        Product { name: name.into(), slug: name.to_lowercase(), ..Default::default() }
    }

    #[tokio::test]
    async fn refresh_overlays_remote_data() {
        let shared = SharedCatalog::new(CatalogSnapshot {
            products: vec![named("Local")],
            ..Default::default()
        });
        let source = StubSource {
            homepage: Some(HomepageData {
                settings: Settings::from_pairs([("site_name", "Remote Site")]),
                categories: vec![Category { name: "From Homepage".into(), ..Default::default() }],
                ..Default::default()
            }),
            products: Some(vec![named("Remote A"), named("Remote B")]),
            categories: Some(vec![Category { name: "From Endpoint".into(), ..Default::default() }]),
            ..Default::default()
        };

        let snapshot = shared.refresh_from(&source).await.unwrap();
        assert_eq!(snapshot.products.len(), 2);
        assert_eq!(snapshot.categories[0].name, "From Endpoint");
        assert_eq!(snapshot.settings.get("site_name"), Some("Remote Site"));
        assert_eq!(shared.current().await.products[0].name, "Remote A");
    }

    #[tokio::test]
    async fn missing_categories_payload_keeps_homepage_categories() {
        let shared = SharedCatalog::new(CatalogSnapshot::default());
        let source = StubSource {
            homepage: Some(HomepageData {
                categories: vec![Category { name: "From Homepage".into(), ..Default::default() }],
                ..Default::default()
            }),
            products: Some(vec![]),
            categories: None,
            ..Default::default()
        };

        let snapshot = shared.refresh_from(&source).await.unwrap();
        assert_eq!(snapshot.categories[0].name, "From Homepage");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_current_snapshot() {
        let shared = SharedCatalog::new(CatalogSnapshot {
            products: vec![named("Local")],
            ..Default::default()
        });
        let before = shared.current().await;
        let source = StubSource { fail: true, ..Default::default() };

        assert!(shared.refresh_from(&source).await.is_err());
        let after = shared.current().await;
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn readers_keep_their_snapshot_across_replace() {
        let shared = SharedCatalog::new(CatalogSnapshot {
            products: vec![named("Old")],
            ..Default::default()
        });
        let held = shared.current().await;
        shared.replace(CatalogSnapshot::default()).await;

        assert_eq!(held.products[0].name, "Old");
        assert!(shared.current().await.products.is_empty());
    }
}
