//! Turning request parameters into a list query and running it

use super::filter::FilterPredicate;
use super::pagination::{PageWindow, PaginationResult};
use super::params::RawParameters;
use super::projection::Projection;
use super::sort::SortSpec;
use crate::config::{CountMode, QueryConfig};
use crate::core::collection::Collection;
use crate::core::error::{FoodsResult, QueryError, StorageError};
use serde_json::Value;

/// A fully specified list query
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: FilterPredicate,
    pub projection: Projection,
    pub sort: SortSpec,
    pub window: PageWindow,
}

/// What a list query produced
#[derive(Debug, Clone)]
pub struct ListOutcome {
    pub items: Vec<Value>,
    pub pagination: PaginationResult,

    /// The count pagination was computed against (see [`CountMode`])
    pub total: u64,

    pub window: PageWindow,
}

/// Builds and executes list queries
///
/// # Example
///
/// ```rust,ignore
/// let builder = ListQueryBuilder::new(config.query.clone());
/// let params = RawParameters::from_pairs([("select", "name"), ("sort", "-name")]);
/// let outcome = builder.execute(collection.as_ref(), &params).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListQueryBuilder {
    config: QueryConfig,
}

impl ListQueryBuilder {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Build the query without touching storage
    ///
    /// Only the filter can fail; every directive falls back to a default.
    pub fn build(&self, params: &RawParameters) -> Result<ListQuery, QueryError> {
        let filter = FilterPredicate::from_params(&params.filter_params())?;

        let projection = params
            .get_str("select")
            .map(Projection::parse)
            .unwrap_or_default();

        let sort = params
            .get_str("sort")
            .map(SortSpec::parse)
            .filter(|spec| !spec.is_empty())
            .unwrap_or_else(|| SortSpec::parse(&self.config.default_sort));

        let window =
            PageWindow::from_params(params.get_str("page"), params.get_str("limit"), &self.config);

        Ok(ListQuery {
            filter,
            projection,
            sort,
            window,
        })
    }

    /// Build the query, count, fetch the page and compute pagination links
    ///
    /// The count and the fetch are two separate reads, so under concurrent
    /// writes the total may not match the page exactly.
    pub async fn execute(
        &self,
        collection: &dyn Collection,
        params: &RawParameters,
    ) -> FoodsResult<ListOutcome> {
        let query = self.build(params)?;

        let total = match self.config.count_mode {
            CountMode::Collection => collection.count().await,
            CountMode::Filtered => collection.count_matching(&query.filter).await,
        }
        .map_err(|e| StorageError::query_failed("count", e))?;

        let items = collection
            .find(
                &query.filter,
                &query.projection,
                &query.sort,
                query.window.skip(),
                query.window.limit,
            )
            .await
            .map_err(|e| StorageError::query_failed("find", e))?;

        let pagination = PaginationResult::compute(&query.window, total);

        tracing::debug!(
            filter = %query.filter.to_json(),
            select = %query.projection.to_directive(),
            sort = %query.sort.to_directive(),
            page = query.window.page,
            limit = query.window.limit,
            total,
            returned = items.len(),
            "list query executed"
        );

        Ok(ListOutcome {
            items,
            pagination,
            total,
            window: query.window,
        })
    }
}
