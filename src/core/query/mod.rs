//! List query construction: filters, projection, sorting and pagination
//!
//! ```text
//! GET /api/v1/foods?category=fruit&price[lte]=3&select=name,price&sort=-price&page=2&limit=5
//!
//!   RawParameters ──► ListQueryBuilder::build ──► ListQuery
//!                                                  ├─ FilterPredicate  {"category":"fruit","price":{"$lte":"3"}}
//!                                                  ├─ Projection       name price
//!                                                  ├─ SortSpec         -price
//!                                                  └─ PageWindow       page 2, limit 5, [5, 10)
//!
//!   ListQueryBuilder::execute ──► Collection::count + Collection::find ──► ListOutcome
//! ```

pub mod builder;
pub mod document;
pub mod filter;
pub mod pagination;
pub mod params;
pub mod projection;
pub mod sort;

pub use builder::{ListOutcome, ListQuery, ListQueryBuilder};
pub use filter::{Condition, FilterOperator, FilterPredicate};
pub use pagination::{PageLink, PageWindow, PaginationResult};
pub use params::{RESERVED_PARAMS, RawParameters, RawValue};
pub use projection::Projection;
pub use sort::{SortDirection, SortKey, SortSpec};
