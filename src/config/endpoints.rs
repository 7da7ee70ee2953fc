use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.hibiscusefsya.com/api";

/// Absolute URLs of the catalog backend's PHP endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub homepage: Url,
    pub products: Url,
    pub categories: Url,
    pub settings: Url,
}

impl Endpoints {
    pub fn from_base(base: &str) -> Result<Self, url::ParseError> {
        let mut base = base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)?;

        Ok(Self {
            homepage: base.join("homepage.php")?,
            products: base.join("products.php")?,
            categories: base.join("categories.php")?,
            settings: base.join("settings.php")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_to_api_directory() {
        let endpoints = Endpoints::from_base(DEFAULT_API_BASE).unwrap();
        assert_eq!(endpoints.products.as_str(), "https://api.hibiscusefsya.com/api/products.php");
        assert_eq!(endpoints.homepage.as_str(), "https://api.hibiscusefsya.com/api/homepage.php");

        let endpoints = Endpoints::from_base("http://localhost:8080/v1/").unwrap();
        assert_eq!(endpoints.categories.as_str(), "http://localhost:8080/v1/categories.php");
    }

    #[test]
    fn rejects_relative_base() {
        assert!(Endpoints::from_base("api/products").is_err());
    }
}
