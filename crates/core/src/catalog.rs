use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::product::Product;

const DEMO_CATALOG: &str = include_str!("../data/catalog.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read-only product listing keyed by lower-cased category name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: BTreeMap<String, Vec<Product>>,
}

impl Catalog {
    pub fn new<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Product>)>,
    {
        let mut normalized: BTreeMap<String, Vec<Product>> = BTreeMap::new();
        for (category, products) in categories {
            normalized.entry(category.to_lowercase()).or_default().extend(products);
        }
        Self { categories: normalized }
    }

    /// The built-in catalog shipped with the binary.
    pub fn demo() -> Result<Self, CatalogError> {
        Self::from_toml_str(DEMO_CATALOG)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let categories = toml::from_str::<BTreeMap<String, Vec<Product>>>(raw)?;
        Ok(Self::new(categories))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn all(&self) -> &BTreeMap<String, Vec<Product>> {
        &self.categories
    }

    /// Products in `category`; an unknown category yields an empty slice.
    pub fn search(&self, category: &str) -> &[Product] {
        self.categories.get(&category.to_lowercase()).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.categories.values().flatten().find(|product| product.matches_name(name))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn product_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}
