use std::collections::HashMap;

use crate::models::catalog::{ ListMeta, Product, ProductPage };

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 12;

/// Catalog listing filter. Unset fields are left out of the remote request so
/// an empty query asks the backend for its own default listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let number = |key: &str| {
            params
                .get(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|n| *n > 0)
        };
        let text = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            page: number("page"),
            limit: number("limit"),
            category: text("category"),
            search: text("search"),
        }
    }

    pub fn page(&self) -> u64 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }

    /// Category filter compares slugs; search is a case-insensitive substring
    /// match over name, category name and description.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            let slug = product.category_slug.as_deref().unwrap_or_default();
            if !slug.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystacks = [
                Some(product.name.as_str()),
                product.category_name.as_deref(),
                product.description.as_deref(),
            ];
            let hit = haystacks
                .iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, products: &[Product]) -> ProductPage {
        let matching: Vec<&Product> = products
            .iter()
            .filter(|p| self.matches(p))
            .collect();
        let meta = paginate(matching.len() as u64, self.page(), self.limit());
        let start = (meta.page - 1)
            .checked_mul(meta.limit)
            .and_then(|start| usize::try_from(start).ok());
        let data = match start {
            Some(start) =>
                matching
                    .into_iter()
                    .skip(start)
                    .take(usize::try_from(meta.limit).unwrap_or(usize::MAX))
                    .cloned()
                    .collect(),
            None => Vec::new(),
        };

        ProductPage { data, meta }
    }
}

pub fn paginate(total: u64, page: u64, limit: u64) -> ListMeta {
    let page = page.max(1);
    let limit = limit.max(1);
    let total_pages = total.div_ceil(limit);

    ListMeta {
        total,
        page,
        limit,
        total_pages,
        has_prev: page > 1,
        has_next: page < total_pages,
    }
}
