pub mod fetcher;
pub mod traits;

pub use fetcher::HttpProductSource;
pub use traits::ProductSource;
