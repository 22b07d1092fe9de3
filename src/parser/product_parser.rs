// Product search payload parsing
use crate::model::Product;
use serde_json::Value;

/// Extracts valid products from a search payload.
///
/// Anything that is not an object with a non-empty brand, a non-empty title
/// and a numeric price is dropped without error.
pub fn parse_products(payload: &Value) -> Vec<Product> {
    let Some(items) = payload.get("products").and_then(Value::as_array) else {
        return Vec::new();
    };

    items.iter().filter_map(parse_product).collect()
}

fn parse_product(item: &Value) -> Option<Product> {
    let fields = item.as_object()?;
    let brand = text_field(fields.get("brand"))?;
    let title = text_field(fields.get("title"))?;
    let price = price_field(fields.get("price")?)?;

    Some(Product { brand, title, price })
}

fn text_field(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn price_field(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}
