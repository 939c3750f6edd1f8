use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{encode, parse_args, ShoppingContext, Tool, ToolError};

pub struct ShowAllProducts;

#[async_trait]
impl Tool for ShowAllProducts {
    fn name(&self) -> &'static str {
        "show_all_products"
    }

    fn description(&self) -> &'static str {
        "List every available product, grouped by category, with name, price, url and description."
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn execute(
        &self,
        context: &mut ShoppingContext,
        _input: Value,
    ) -> Result<Value, ToolError> {
        encode(self.name(), context.catalog().all())
    }
}

pub struct SearchProduct;

#[derive(Deserialize)]
struct SearchArgs {
    query: String,
}

#[async_trait]
impl Tool for SearchProduct {
    fn name(&self) -> &'static str {
        "search_product"
    }

    fn description(&self) -> &'static str {
        "Search products by category name (for example laptop, phone, tablet, headphones, \
         smartwatch). Returns an empty list when the category has no products."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The category name to search for."}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, context: &mut ShoppingContext, input: Value) -> Result<Value, ToolError> {
        let args: SearchArgs = parse_args(self.name(), input)?;
        encode(self.name(), context.catalog().search(&args.query))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};
    use shopkeep_core::Catalog;

    use crate::tools::{ShoppingContext, ToolRegistry};

    fn context() -> ShoppingContext {
        ShoppingContext::new(Arc::new(Catalog::demo().expect("built-in catalog parses")))
    }

    #[tokio::test]
    async fn show_all_returns_every_category() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let output = registry.execute("show_all_products", &mut context, Value::Null).await;
        let output = output.unwrap_or_default();
        let categories = output.as_object().map(|map| map.len()).unwrap_or_default();

        assert_eq!(categories, 5);
        assert_eq!(output["phone"][0]["name"], "Phone A");
        assert_eq!(output["phone"][0]["price"], "$699");
    }

    #[tokio::test]
    async fn search_matches_catalog_listing() {
        let registry = ToolRegistry::shopping();
        let mut context = context();
        let catalog = Catalog::demo().expect("built-in catalog parses");
        let expected = serde_json::to_value(catalog.search("laptop")).unwrap_or_default();

        let output = registry
            .execute("search_product", &mut context, json!({"query": "LAPTOP"}))
            .await
            .unwrap_or_default();

        assert_eq!(output, expected);
        assert_eq!(output.as_array().map(Vec::len), Some(4));
    }

    #[tokio::test]
    async fn search_for_unknown_category_is_empty_list() {
        let registry = ToolRegistry::shopping();
        let mut context = context();

        let output = registry
            .execute("search_product", &mut context, json!({"query": "toaster"}))
            .await
            .unwrap_or_default();

        assert_eq!(output, json!([]));
    }
}
