use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Display price, `$<number>`.
    pub price: String,
    pub url: String,
    pub description: String,
}

impl Product {
    pub fn price_amount(&self) -> Result<Decimal, DomainError> {
        let trimmed = self.price.trim();
        let amount = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        Decimal::from_str(amount).map_err(|_| DomainError::InvalidPrice {
            product: self.name.clone(),
            price: self.price.clone(),
        })
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Two-decimal money text, rounding half to even.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{rounded:.2}")
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{format_amount, Product};
    use crate::errors::DomainError;

    fn product(name: &str, price: &str) -> Product {
        Product {
            name: name.to_string(),
            price: price.to_string(),
            url: format!("http://example.com/{}", name.to_lowercase().replace(' ', "-")),
            description: String::new(),
        }
    }

    #[test]
    fn parses_dollar_prefixed_price() {
        assert_eq!(product("Laptop A", "$999").price_amount(), Ok(Decimal::new(999, 0)));
        assert_eq!(product("Cable", "$12.50").price_amount(), Ok(Decimal::new(1250, 2)));
    }

    #[test]
    fn rejects_malformed_price() {
        let error = product("Mystery Box", "$ask").price_amount();
        assert_eq!(
            error,
            Err(DomainError::InvalidPrice {
                product: "Mystery Box".to_string(),
                price: "$ask".to_string(),
            })
        );
    }

    #[test]
    fn name_match_ignores_case() {
        let laptop = product("Laptop A", "$999");
        assert!(laptop.matches_name("laptop a"));
        assert!(laptop.matches_name("LAPTOP A"));
        assert!(!laptop.matches_name("Laptop"));
    }

    #[test]
    fn amounts_round_to_cents() {
        assert_eq!(format_amount(Decimal::new(1698, 0)), "1698.00");
        assert_eq!(format_amount(Decimal::new(1999, 3)), "2.00");
        assert_eq!(format_amount(Decimal::new(125, 3)), "0.12");
        assert_eq!(format_amount(Decimal::new(135, 3)), "0.14");
        assert_eq!(format_amount(Decimal::new(5, 1)), "0.50");
    }
}
