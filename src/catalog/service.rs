use log::{ info, warn };
use std::sync::Arc;

use super::fallback::FallbackCatalog;
use super::query::ProductQuery;
use super::{ CatalogError, CatalogSnapshot, CatalogSource, SharedCatalog };
use crate::models::catalog::{ Article, ArticleDetail, Category, HomepageData, Product, ProductPage };

pub const DEFAULT_ARTICLE_IMAGE: &str = "tips1.jpg";
const RELATED_ARTICLES_LIMIT: usize = 2;

/// Page-level catalog reads. Each read tries the remote backend first and
/// answers from the local dataset when that fails.
#[derive(Clone)]
pub struct CatalogService {
    remote: Option<Arc<dyn CatalogSource>>,
    fallback: Arc<FallbackCatalog>,
    shared: SharedCatalog,
}

impl CatalogService {
    /// Starts serving the fallback snapshot right away; call `refresh` to
    /// pull the remote one.
    pub fn new(remote: Option<Arc<dyn CatalogSource>>, fallback: FallbackCatalog) -> Self {
        let shared = SharedCatalog::new(fallback.snapshot());
        Self {
            remote,
            fallback: Arc::new(fallback),
            shared,
        }
    }

    pub fn shared(&self) -> &SharedCatalog {
        &self.shared
    }

    pub async fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.shared.current().await
    }

    pub async fn refresh(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        match &self.remote {
            Some(remote) => self.shared.refresh_from(remote.as_ref()).await,
            None => {
                info!("No remote catalog configured, keeping local snapshot");
                Ok(self.shared.current().await)
            }
        }
    }

    fn falling_back(&self, what: &str, err: &CatalogError) {
        warn!("Remote {} unavailable ({}), answering from fallback data", what, err);
    }

    pub async fn homepage(&self) -> Result<HomepageData, CatalogError> {
        if let Some(remote) = &self.remote {
            match remote.homepage().await {
                Ok(data) => {
                    return Ok(data);
                }
                Err(e) => self.falling_back("homepage", &e),
            }
        }
        self.fallback.homepage().await
    }

    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        if let Some(remote) = &self.remote {
            match remote.products(query).await {
                Ok(page) => {
                    return Ok(page);
                }
                Err(e) => self.falling_back("products", &e),
            }
        }
        self.fallback.products(query).await
    }

    pub async fn product_detail(&self, slug: &str) -> Result<Product, CatalogError> {
        if let Some(remote) = &self.remote {
            match remote.product_by_slug(slug).await {
                Ok(product) => {
                    return Ok(product);
                }
                Err(e) => self.falling_back("product detail", &e),
            }
        }
        self.fallback.product_by_slug(slug).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(remote) = &self.remote {
            match remote.categories().await {
                Ok(categories) => {
                    return Ok(categories);
                }
                Err(e) => self.falling_back("categories", &e),
            }
        }
        self.fallback.categories().await
    }

    /// Looks the article up among the remote homepage inspirations and fills
    /// in the long-form body from the local dataset. Articles the remote does
    /// not list are served from the local dataset alone.
    pub async fn article_detail(&self, slug: &str) -> Result<ArticleDetail, CatalogError> {
        if let Some(remote) = &self.remote {
            match remote.articles().await {
                Ok(inspirations) => {
                    if let Some(found) = inspirations.iter().find(|a| a.slug == slug) {
                        return Ok(ArticleDetail {
                            article: self.merge_local_content(found.clone()),
                            related: related_articles(slug, &inspirations),
                        });
                    }
                    info!("Article '{}' not among remote inspirations, trying fallback", slug);
                }
                Err(e) => self.falling_back("articles", &e),
            }
        }

        let local = self.fallback.data().articles.as_slice();
        let article = self.fallback.article_by_slug(slug).await?;
        Ok(ArticleDetail {
            article,
            related: related_articles(slug, local),
        })
    }

    fn merge_local_content(&self, mut article: Article) -> Article {
        let local = self.fallback.find_article(&article.slug);

        article.image = local
            .and_then(|l| l.image.clone())
            .or(article.image.take())
            .or_else(|| Some(DEFAULT_ARTICLE_IMAGE.to_string()));
        article.full_content = local
            .and_then(|l| l.full_content.clone())
            .or(article.full_content.take())
            .or_else(|| Some(format!("<p>{}</p>", article.content)));
        article
    }
}

fn related_articles(slug: &str, articles: &[Article]) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| a.slug != slug)
        .take(RELATED_ARTICLES_LIMIT)
        .cloned()
        .collect()
}
