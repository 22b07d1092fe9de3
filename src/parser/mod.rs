pub mod product_parser;

pub use product_parser::parse_products;
