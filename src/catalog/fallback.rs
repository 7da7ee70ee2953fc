use async_trait::async_trait;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::query::ProductQuery;
use super::{ CatalogError, CatalogSnapshot, CatalogSource };
use crate::models::catalog::{
    Article,
    Category,
    HomepageData,
    HomepageStats,
    Product,
    ProductPage,
    Settings,
};

const BUILTIN_DATA: &str = include_str!("../../data/fallback.json");

pub const RELATED_PRODUCTS_LIMIT: usize = 4;
const HOMEPAGE_FEATURED_LIMIT: usize = 4;
const HOMEPAGE_LATEST_LIMIT: usize = 4;

/// Local dataset served when the remote backend is unreachable.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FallbackData {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub hero_images: Vec<String>,
}

impl FallbackData {
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(BUILTIN_DATA)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!("Loading fallback catalog from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let data: FallbackData = serde_json::from_str(&contents)?;
        info!(
            "Loaded fallback catalog: {} products, {} categories, {} articles",
            data.products.len(),
            data.categories.len(),
            data.articles.len()
        );
        Ok(data)
    }

    /// File dataset when a path is given, the bundled one otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::builtin(),
        }
    }
}

pub struct FallbackCatalog {
    data: FallbackData,
}

impl FallbackCatalog {
    pub fn new(data: FallbackData) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &FallbackData {
        &self.data
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            products: self.data.products.clone(),
            categories: self.data.categories.clone(),
            settings: self.data.settings.clone(),
        }
    }

    pub fn find_article(&self, slug: &str) -> Option<&Article> {
        self.data.articles.iter().find(|a| a.slug == slug)
    }

    fn homepage_data(&self) -> HomepageData {
        let products = &self.data.products;
        let featured: Vec<Product> = products
            .iter()
            .filter(|p| p.featured)
            .take(HOMEPAGE_FEATURED_LIMIT)
            .cloned()
            .collect();

        HomepageData {
            featured_products: featured,
            latest_products: products.iter().take(HOMEPAGE_LATEST_LIMIT).cloned().collect(),
            categories: self.data.categories.clone(),
            inspirations: self.data.articles.clone(),
            stats: Some(HomepageStats {
                total_products: products.len() as u64,
                total_categories: self.data.categories.len() as u64,
            }),
            settings: self.data.settings.clone(),
            hero_images: self.data.hero_images.clone(),
        }
    }
}

/// Up to four other products sharing `product`'s category.
pub fn related_products(product: &Product, products: &[Product]) -> Vec<Product> {
    let category = product.category_lower();
    if category.is_empty() {
        return Vec::new();
    }
    products
        .iter()
        .filter(|p| p.slug != product.slug && p.category_lower() == category)
        .take(RELATED_PRODUCTS_LIMIT)
        .cloned()
        .collect()
}

#[async_trait]
impl CatalogSource for FallbackCatalog {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn homepage(&self) -> Result<HomepageData, CatalogError> {
        Ok(self.homepage_data())
    }

    async fn products(&self, query: &ProductQuery) -> Result<ProductPage, CatalogError> {
        Ok(query.apply(&self.data.products))
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Product, CatalogError> {
        let product = self.data.products
            .iter()
            .find(|p| p.slug == slug)
            .ok_or_else(|| CatalogError::NotFound(slug.to_string()))?;

        let mut detail = product.clone();
        detail.related_products = related_products(product, &self.data.products);
        Ok(detail)
    }

    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.data.categories.clone())
    }

    async fn settings(&self) -> Result<Settings, CatalogError> {
        Ok(self.data.settings.clone())
    }

    async fn articles(&self) -> Result<Vec<Article>, CatalogError> {
        Ok(self.data.articles.clone())
    }
}
