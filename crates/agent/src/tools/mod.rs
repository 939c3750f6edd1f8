//! Shopping tools the model can invoke, and the registry that dispatches them.

mod cart;
mod catalog;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shopkeep_core::{Cart, Catalog, DomainError};
use thiserror::Error;

use crate::llm::ToolSchema;

pub use cart::{AddToCart, Checkout, RemoveFromCart, SeeCart};
pub use catalog::{SearchProduct, ShowAllProducts};

/// Per-session state the tools read and mutate. Each session owns its cart.
#[derive(Clone, Debug)]
pub struct ShoppingContext {
    catalog: Arc<Catalog>,
    cart: Cart,
}

impl ShoppingContext {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog, cart: Cart::new() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("model requested unknown tool `{0}`")]
    UnknownTool(String),
    #[error("invalid arguments for tool `{tool}`: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// Checkout details failed to parse. Carries no source so the raw values stay out of logs.
    #[error("checkout details are missing or malformed")]
    InvalidCheckoutDetails,
    #[error("could not encode result of tool `{tool}`: {source}")]
    Encode {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema of the argument object.
    fn parameters(&self) -> Value;
    async fn execute(&self, context: &mut ShoppingContext, input: Value)
        -> Result<Value, ToolError>;

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Registry holding the six shopping tools.
    pub fn shopping() -> Self {
        let mut registry = Self::default();
        registry.register(ShowAllProducts);
        registry.register(SearchProduct);
        registry.register(AddToCart);
        registry.register(SeeCart);
        registry.register(RemoveFromCart);
        registry.register(Checkout);
        registry
    }

    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), Box::new(tool)).is_none() {
            self.order.push(name);
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Schemas in registration order.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.order.iter().filter_map(|name| self.tools.get(name)).map(|tool| tool.schema()).collect()
    }

    pub async fn execute(
        &self,
        name: &str,
        context: &mut ShoppingContext,
        input: Value,
    ) -> Result<Value, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(context, input).await
    }
}

/// Renders a tool result as message content: strings verbatim, everything else as JSON.
pub fn render_output(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn parse_args<T>(tool: &'static str, input: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned,
{
    let input = if input.is_null() { Value::Object(Default::default()) } else { input };
    serde_json::from_value(input).map_err(|source| ToolError::InvalidArguments { tool, source })
}

fn encode<T>(tool: &'static str, value: &T) -> Result<Value, ToolError>
where
    T: serde::Serialize + ?Sized,
{
    serde_json::to_value(value).map_err(|source| ToolError::Encode { tool, source })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};
    use shopkeep_core::Catalog;

    use super::{render_output, ShoppingContext, ToolError, ToolRegistry};

    fn context() -> ShoppingContext {
        ShoppingContext::new(Arc::new(Catalog::demo().expect("built-in catalog parses")))
    }

    #[test]
    fn shopping_registry_declares_six_tools_in_order() {
        let registry = ToolRegistry::shopping();
        assert_eq!(registry.len(), 6);
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![
                "show_all_products",
                "search_product",
                "add_to_cart",
                "see_cart",
                "remove_from_cart",
                "checkout"
            ]
        );

        let schemas = registry.schemas();
        assert!(schemas.iter().all(|schema| !schema.description.is_empty()));
        assert!(schemas.iter().all(|schema| schema.parameters["type"] == "object"));
        assert_eq!(schemas[5].parameters["required"], json!(["address", "phone_no", "card_no"]));
    }

    #[test]
    fn registering_same_name_twice_keeps_one_entry() {
        let mut registry = ToolRegistry::shopping();
        registry.register(super::SeeCart);
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.schemas().len(), 6);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let result = registry.execute("apply_coupon", &mut context, Value::Null).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(ref name)) if name == "apply_coupon"));
    }

    #[tokio::test]
    async fn malformed_arguments_are_rejected() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let result = registry.execute("add_to_cart", &mut context, json!({"name": 3})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments { tool: "add_to_cart", .. })));
        assert!(context.cart().is_empty());
    }

    #[test]
    fn strings_render_verbatim_and_data_as_json() {
        assert_eq!(render_output(&json!("Your cart is empty.")), "Your cart is empty.");
        assert_eq!(render_output(&json!([{"name": "Laptop A"}])), r#"[{"name":"Laptop A"}]"#);
    }
}
