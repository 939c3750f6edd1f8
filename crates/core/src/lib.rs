pub mod cart;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use cart::Cart;
pub use catalog::{Catalog, CatalogError};
pub use domain::product::{format_amount, Product};
pub use errors::{ApplicationError, DomainError, InterfaceError};
