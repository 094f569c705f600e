pub mod product;
pub mod query;

pub use product::{new_badge, Product, ProductDraft, ProductPatch, StockStatus, NEW_BADGE_DAYS};
pub use query::{CatalogQuery, SortKey};
