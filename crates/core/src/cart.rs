use rust_decimal::Decimal;

use crate::catalog::Catalog;
use crate::domain::product::Product;
use crate::errors::DomainError;

/// Ordered cart contents for one session. Duplicates are kept as separate entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the first catalog product named `name`, if any.
    pub fn add_from_catalog(&mut self, catalog: &Catalog, name: &str) -> Option<&Product> {
        let product = catalog.find_by_name(name)?.clone();
        self.items.push(product);
        self.items.last()
    }

    /// Drops every entry named `name` and returns how many were removed.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|product| !product.matches_name(name));
        before - self.items.len()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> Result<Decimal, DomainError> {
        self.items.iter().try_fold(Decimal::ZERO, |sum, product| Ok(sum + product.price_amount()?))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Totals and empties the cart. `None` when there was nothing to buy; the
    /// cart is left untouched if any price fails to parse.
    pub fn checkout(&mut self) -> Result<Option<Decimal>, DomainError> {
        if self.is_empty() {
            return Ok(None);
        }
        let total = self.total()?;
        self.clear();
        Ok(Some(total))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Cart;
    use crate::catalog::Catalog;
    use crate::domain::product::Product;
    use crate::errors::DomainError;

    fn names(cart: &Cart) -> Vec<&str> {
        cart.items().iter().map(|product| product.name.as_str()).collect()
    }

    #[test]
    fn add_appends_catalog_entry_and_keeps_duplicates() {
        let catalog = Catalog::demo().expect("built-in catalog parses");
        let mut cart = Cart::new();

        let added = cart.add_from_catalog(&catalog, "laptop a").map(|product| product.name.clone());
        assert_eq!(added.as_deref(), Some("Laptop A"));
        cart.add_from_catalog(&catalog, "Laptop A");

        assert_eq!(names(&cart), vec!["Laptop A", "Laptop A"]);
    }

    #[test]
    fn add_unknown_product_leaves_cart_unchanged() {
        let catalog = Catalog::demo().expect("built-in catalog parses");
        let mut cart = Cart::new();
        cart.add_from_catalog(&catalog, "Phone A");

        assert!(cart.add_from_catalog(&catalog, "Nonexistent").is_none());
        assert_eq!(names(&cart), vec!["Phone A"]);
    }

    #[test]
    fn remove_drops_all_matches_and_preserves_order() {
        let catalog = Catalog::demo().expect("built-in catalog parses");
        let mut cart = Cart::new();
        for name in ["Phone A", "Laptop A", "Tablet B", "laptop a", "Headphones A"] {
            cart.add_from_catalog(&catalog, name);
        }

        assert_eq!(cart.remove_named("LAPTOP A"), 2);
        assert_eq!(names(&cart), vec!["Phone A", "Tablet B", "Headphones A"]);
        assert_eq!(cart.remove_named("Laptop A"), 0);
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn checkout_totals_and_clears() {
        let catalog = Catalog::demo().expect("built-in catalog parses");
        let mut cart = Cart::new();
        cart.add_from_catalog(&catalog, "Laptop A");
        cart.add_from_catalog(&catalog, "Phone A");

        let total = cart.checkout();
        assert_eq!(total, Ok(Some(Decimal::new(1698, 0))));
        assert_eq!(total.ok().flatten().map(|value| format!("{value:.2}")).as_deref(), Some("1698.00"));
        assert!(cart.is_empty());
    }

    #[test]
    fn checkout_of_empty_cart_is_none() {
        let mut cart = Cart::new();
        assert_eq!(cart.checkout(), Ok(None));
        assert!(cart.is_empty());
    }

    #[test]
    fn checkout_with_malformed_price_keeps_items() {
        let catalog = Catalog::new(vec![(
            "misc".to_string(),
            vec![Product {
                name: "Mystery Box".to_string(),
                price: "priceless".to_string(),
                url: String::new(),
                description: String::new(),
            }],
        )]);
        let mut cart = Cart::new();
        cart.add_from_catalog(&catalog, "Mystery Box");

        let result = cart.checkout();
        assert!(matches!(result, Err(DomainError::InvalidPrice { .. })));
        assert_eq!(cart.len(), 1);
    }
}
