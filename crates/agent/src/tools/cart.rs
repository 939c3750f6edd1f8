use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use shopkeep_core::format_amount;

use super::{encode, parse_args, ShoppingContext, Tool, ToolError};

pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";
pub const EMPTY_CHECKOUT_MESSAGE: &str = "Your cart is empty. Nothing to checkout.";

#[derive(Deserialize)]
struct ProductArgs {
    product_name: String,
}

fn product_name_schema(action: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "product_name": {"type": "string", "description": format!("The name of the product to {action}.")}
        },
        "required": ["product_name"]
    })
}

pub struct AddToCart;

#[async_trait]
impl Tool for AddToCart {
    fn name(&self) -> &'static str {
        "add_to_cart"
    }

    fn description(&self) -> &'static str {
        "Add a product to the shopping cart by its exact name. Returns a confirmation, or a \
         not-found message when no product has that name."
    }

    fn parameters(&self) -> Value {
        product_name_schema("add")
    }

    async fn execute(&self, context: &mut ShoppingContext, input: Value) -> Result<Value, ToolError> {
        let args: ProductArgs = parse_args(self.name(), input)?;
        let ShoppingContext { catalog, cart } = context;

        let message = match cart.add_from_catalog(catalog, &args.product_name) {
            Some(_) => format!("{} has been added to your cart.", args.product_name),
            None => format!("{} not found.", args.product_name),
        };
        Ok(Value::String(message))
    }
}

pub struct SeeCart;

#[async_trait]
impl Tool for SeeCart {
    fn name(&self) -> &'static str {
        "see_cart"
    }

    fn description(&self) -> &'static str {
        "Show the items currently in the shopping cart, or a message saying the cart is empty."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(
        &self,
        context: &mut ShoppingContext,
        _input: Value,
    ) -> Result<Value, ToolError> {
        if context.cart().is_empty() {
            return Ok(Value::String(EMPTY_CART_MESSAGE.to_string()));
        }
        encode(self.name(), context.cart().items())
    }
}

pub struct RemoveFromCart;

#[async_trait]
impl Tool for RemoveFromCart {
    fn name(&self) -> &'static str {
        "remove_from_cart"
    }

    fn description(&self) -> &'static str {
        "Remove every cart entry with the given product name. Reports whether anything was removed."
    }

    fn parameters(&self) -> Value {
        product_name_schema("remove")
    }

    async fn execute(&self, context: &mut ShoppingContext, input: Value) -> Result<Value, ToolError> {
        let args: ProductArgs = parse_args(self.name(), input)?;
        let removed = context.cart_mut().remove_named(&args.product_name);

        let message = if removed == 0 {
            format!("{} was not in your cart.", args.product_name)
        } else {
            format!("{} has been removed from your cart.", args.product_name)
        };
        Ok(Value::String(message))
    }
}

pub struct Checkout;

// Contact and payment details must be present but are taken as-is, whatever
// their JSON type, and are never stored or echoed.
#[derive(Deserialize)]
struct CheckoutArgs {
    #[serde(rename = "address")]
    _address: Value,
    #[serde(rename = "phone_no")]
    _phone_no: Value,
    #[serde(rename = "card_no")]
    _card_no: Value,
}

#[async_trait]
impl Tool for Checkout {
    fn name(&self) -> &'static str {
        "checkout"
    }

    fn description(&self) -> &'static str {
        "Finalize the order: charges the cart total, clears the cart and confirms delivery. \
         Requires the delivery address, phone number and payment card number."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {"type": "string", "description": "The delivery address."},
                "phone_no": {"type": "integer", "description": "The customer's phone number."},
                "card_no": {"type": "integer", "description": "The payment card number."}
            },
            "required": ["address", "phone_no", "card_no"]
        })
    }

    async fn execute(&self, context: &mut ShoppingContext, input: Value) -> Result<Value, ToolError> {
        let _details: CheckoutArgs =
            parse_args(self.name(), input).map_err(|_| ToolError::InvalidCheckoutDetails)?;

        let message = match context.cart_mut().checkout()? {
            None => EMPTY_CHECKOUT_MESSAGE.to_string(),
            Some(total) => format!(
                "Checkout complete! Your total is ${}. You will receive your order in 3 working days.",
                format_amount(total)
            ),
        };
        Ok(Value::String(message))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};
    use shopkeep_core::{Catalog, Product};

    use super::{EMPTY_CART_MESSAGE, EMPTY_CHECKOUT_MESSAGE};
    use crate::tools::{ShoppingContext, ToolError, ToolRegistry};

    fn context() -> ShoppingContext {
        ShoppingContext::new(Arc::new(Catalog::demo().expect("built-in catalog parses")))
    }

    async fn call(registry: &ToolRegistry, context: &mut ShoppingContext, tool: &str, args: Value) -> Value {
        registry.execute(tool, context, args).await.unwrap_or_else(|error| json!(error.to_string()))
    }

    fn checkout_args() -> Value {
        json!({"address": "1 Main St", "phone_no": 5550100, "card_no": 4111111111111111u64})
    }

    #[tokio::test]
    async fn add_then_view_includes_product() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let added = call(&registry, &mut context, "add_to_cart", json!({"product_name": "Laptop A"})).await;
        assert_eq!(added, json!("Laptop A has been added to your cart."));

        let cart = call(&registry, &mut context, "see_cart", json!({})).await;
        assert_eq!(cart[0]["name"], "Laptop A");
        assert_eq!(cart[0]["url"], "http://example.com/laptop-a");
    }

    #[tokio::test]
    async fn adding_unknown_product_reports_not_found() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let added =
            call(&registry, &mut context, "add_to_cart", json!({"product_name": "Nonexistent"})).await;

        assert!(added.as_str().unwrap_or_default().contains("not found"));
        assert!(context.cart().is_empty());
    }

    #[tokio::test]
    async fn empty_cart_view_is_a_message() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let cart = call(&registry, &mut context, "see_cart", Value::Null).await;
        assert_eq!(cart, json!(EMPTY_CART_MESSAGE));
    }

    #[tokio::test]
    async fn remove_reports_whether_anything_matched() {
        let registry = ToolRegistry::shopping();
        let mut context = context();
        for name in ["Phone A", "phone a", "Tablet A"] {
            call(&registry, &mut context, "add_to_cart", json!({"product_name": name})).await;
        }

        let removed =
            call(&registry, &mut context, "remove_from_cart", json!({"product_name": "PHONE A"})).await;
        assert_eq!(removed, json!("PHONE A has been removed from your cart."));
        let names =
            context.cart().items().iter().map(|product| product.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Tablet A"]);

        let missing =
            call(&registry, &mut context, "remove_from_cart", json!({"product_name": "Phone A"})).await;
        assert_eq!(missing, json!("Phone A was not in your cart."));
        assert_eq!(context.cart().len(), 1);
    }

    #[tokio::test]
    async fn checkout_totals_and_empties_cart() {
        let registry = ToolRegistry::shopping();
        let mut context = context();
        call(&registry, &mut context, "add_to_cart", json!({"product_name": "Laptop A"})).await;
        call(&registry, &mut context, "add_to_cart", json!({"product_name": "Phone A"})).await;

        let receipt = call(&registry, &mut context, "checkout", checkout_args()).await;

        assert_eq!(
            receipt,
            json!("Checkout complete! Your total is $1698.00. You will receive your order in 3 working days.")
        );
        assert!(context.cart().is_empty());
        assert!(!receipt.as_str().unwrap_or_default().contains("4111"));
    }

    #[tokio::test]
    async fn checkout_total_is_rounded_to_cents() {
        let catalog = Catalog::new(vec![(
            "misc".to_string(),
            vec![Product {
                name: "Sticker".to_string(),
                price: "$1.999".to_string(),
                url: String::new(),
                description: String::new(),
            }],
        )]);
        let registry = ToolRegistry::shopping();
        let mut context = ShoppingContext::new(Arc::new(catalog));
        call(&registry, &mut context, "add_to_cart", json!({"product_name": "Sticker"})).await;

        let receipt = call(&registry, &mut context, "checkout", checkout_args()).await;

        assert_eq!(
            receipt,
            json!("Checkout complete! Your total is $2.00. You will receive your order in 3 working days.")
        );
    }

    #[tokio::test]
    async fn checkout_of_empty_cart_changes_nothing() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let receipt = call(&registry, &mut context, "checkout", checkout_args()).await;
        assert_eq!(receipt, json!(EMPTY_CHECKOUT_MESSAGE));
        assert!(context.cart().is_empty());
    }

    #[tokio::test]
    async fn checkout_with_malformed_price_fails_and_keeps_cart() {
        let catalog = Catalog::new(vec![(
            "misc".to_string(),
            vec![Product {
                name: "Mystery Box".to_string(),
                price: "call us".to_string(),
                url: String::new(),
                description: String::new(),
            }],
        )]);
        let registry = ToolRegistry::shopping();
        let mut context = ShoppingContext::new(Arc::new(catalog));
        call(&registry, &mut context, "add_to_cart", json!({"product_name": "Mystery Box"})).await;

        let result = registry.execute("checkout", &mut context, checkout_args()).await;

        assert!(matches!(result, Err(ToolError::Domain(_))));
        assert_eq!(context.cart().len(), 1);
    }

    #[tokio::test]
    async fn checkout_requires_contact_details() {
        let registry = ToolRegistry::shopping();
        let mut context = context();
        call(&registry, &mut context, "add_to_cart", json!({"product_name": "Laptop A"})).await;

        let result = registry.execute("checkout", &mut context, json!({"address": "1 Main St"})).await;
        assert!(matches!(result, Err(ToolError::InvalidCheckoutDetails)));

        let no_card = json!({"address": "1 Main St", "phone_no": 5550100});
        let result = registry.execute("checkout", &mut context, no_card).await;
        let message = result.map(|_| String::new()).unwrap_or_else(|error| error.to_string());
        assert!(!message.contains("5550100"), "phone number leaked: {message}");
        assert_eq!(context.cart().len(), 1);
    }

    #[tokio::test]
    async fn checkout_accepts_details_of_any_shape() {
        let registry = ToolRegistry::shopping();
        let mut context = context();
        call(&registry, &mut context, "add_to_cart", json!({"product_name": "Phone A"})).await;

        let details = json!({"address": "1 Main St", "phone_no": "555-0100", "card_no": -1});
        let receipt = call(&registry, &mut context, "checkout", details).await;

        assert_eq!(
            receipt,
            json!("Checkout complete! Your total is $699.00. You will receive your order in 3 working days.")
        );
        assert!(context.cart().is_empty());
    }
}
