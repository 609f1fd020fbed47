//! Contract test macro for `Collection` backends.
//!
//! # Generated Tests
//!
//! - counting, with and without a filter
//! - equality, range and `in` filters
//! - sorting, skip/limit and projection
//! - the list query end to end, in both count modes, and far past the end
//! - insert / get / find_by_name / replace / delete, and name conflicts

/// Generate the collection contract suite for a backend.
///
/// `$factory` must produce a fresh, empty `impl Collection + 'static`.
#[macro_export]
macro_rules! collection_contract_tests {
    ($factory:expr) => {
        mod collection_contract_tests {
            use super::*;
            use foods::config::{CountMode, QueryConfig};
            use foods::core::collection::Collection;
            use foods::core::error::FoodError;
            use foods::core::query::{
                FilterPredicate, ListQueryBuilder, Projection, RawParameters, SortSpec,
            };

            async fn seeded() -> impl Collection {
                let collection = $factory;
                seed(&collection).await;
                collection
            }

            fn filter(pairs: &[(&str, &str)]) -> FilterPredicate {
                FilterPredicate::from_params(&RawParameters::from_pairs(pairs.iter().copied()))
                    .expect("filter should parse")
            }

            #[tokio::test]
            async fn test_count_and_count_matching() {
                let collection = seeded().await;

                assert_eq!(collection.count().await.unwrap(), 12);
                assert_eq!(
                    collection
                        .count_matching(&filter(&[("category", "fruit")]))
                        .await
                        .unwrap(),
                    4
                );
                assert_eq!(
                    collection
                        .count_matching(&FilterPredicate::new())
                        .await
                        .unwrap(),
                    12
                );
            }

            #[tokio::test]
            async fn test_find_range_filter_sorted() {
                let collection = seeded().await;

                let docs = collection
                    .find(
                        &filter(&[("calories[gte]", "50"), ("calories[lt]", "90")]),
                        &Projection::all(),
                        &SortSpec::parse("calories"),
                        0,
                        100,
                    )
                    .await
                    .unwrap();

                assert_eq!(names(&docs), ["Food 05", "Food 06", "Food 07", "Food 08"]);
            }

            #[tokio::test]
            async fn test_find_equality_matches_numbers_and_strings() {
                let collection = seeded().await;
                let sort = SortSpec::parse("name");

                let docs = collection
                    .find(
                        &filter(&[("calories", "30")]),
                        &Projection::all(),
                        &sort,
                        0,
                        100,
                    )
                    .await
                    .unwrap();
                assert_eq!(names(&docs), ["Food 03"]);

                let docs = collection
                    .find(
                        &filter(&[("name", "Food 11")]),
                        &Projection::all(),
                        &sort,
                        0,
                        100,
                    )
                    .await
                    .unwrap();
                assert_eq!(names(&docs), ["Food 11"]);
            }

            #[tokio::test]
            async fn test_find_in_filter() {
                let collection = seeded().await;

                let docs = collection
                    .find(
                        &filter(&[("category[in]", "veg,grain"), ("calories[lte]", "60")]),
                        &Projection::all(),
                        &SortSpec::parse("name"),
                        0,
                        100,
                    )
                    .await
                    .unwrap();

                assert_eq!(names(&docs), ["Food 02", "Food 03", "Food 05", "Food 06"]);
            }

            #[tokio::test]
            async fn test_find_numeric_range_skips_text_fields() {
                let collection = seeded().await;
                let sort = SortSpec::parse("name");

                let docs = collection
                    .find(&filter(&[("name[gt]", "10")]), &Projection::all(), &sort, 0, 100)
                    .await
                    .unwrap();
                assert!(docs.is_empty());

                let docs = collection
                    .find(
                        &filter(&[("name[gte]", "Food 10")]),
                        &Projection::all(),
                        &sort,
                        0,
                        100,
                    )
                    .await
                    .unwrap();
                assert_eq!(names(&docs), ["Food 10", "Food 11", "Food 12"]);
            }

            #[tokio::test]
            async fn test_find_unknown_field_matches_nothing() {
                let collection = seeded().await;

                let docs = collection
                    .find(
                        &filter(&[("colour", "green")]),
                        &Projection::all(),
                        &SortSpec::parse("name"),
                        0,
                        100,
                    )
                    .await
                    .unwrap();

                assert!(docs.is_empty());
            }

            #[tokio::test]
            async fn test_find_sort_skip_limit_and_projection() {
                let collection = seeded().await;

                let docs = collection
                    .find(
                        &FilterPredicate::new(),
                        &Projection::parse("name,price"),
                        &SortSpec::parse("-price"),
                        2,
                        3,
                    )
                    .await
                    .unwrap();

                assert_eq!(names(&docs), ["Food 10", "Food 09", "Food 08"]);
                for doc in &docs {
                    assert_eq!(keys(doc), ["id", "name", "price"]);
                }
            }

            #[tokio::test]
            async fn test_list_query_end_to_end() {
                let collection = seeded().await;
                let builder = ListQueryBuilder::new(QueryConfig::default());
                let params = RawParameters::from_pairs([
                    ("select", "name"),
                    ("sort", "-name"),
                    ("page", "2"),
                    ("limit", "5"),
                ]);

                let outcome = builder.execute(&collection, &params).await.unwrap();

                assert_eq!(outcome.window.start_index, 5);
                assert_eq!(outcome.window.end_index, 10);
                assert_eq!(outcome.total, 12);
                assert_eq!(
                    serde_json::to_value(&outcome.pagination).unwrap(),
                    serde_json::json!({
                        "next": {"page": 3, "limit": 5},
                        "prev": {"page": 1, "limit": 5}
                    })
                );
                assert_eq!(
                    names(&outcome.items),
                    ["Food 07", "Food 06", "Food 05", "Food 04", "Food 03"]
                );
                for doc in &outcome.items {
                    assert_eq!(keys(doc), ["id", "name"]);
                }
            }

            #[tokio::test]
            async fn test_list_query_count_modes() {
                let collection = seeded().await;
                let params = RawParameters::from_pairs([
                    ("category", "fruit"),
                    ("sort", "name"),
                    ("limit", "4"),
                ]);

                let unfiltered = ListQueryBuilder::new(QueryConfig::default())
                    .execute(&collection, &params)
                    .await
                    .unwrap();
                assert_eq!(unfiltered.total, 12);
                assert_eq!(unfiltered.items.len(), 4);
                assert!(unfiltered.pagination.next.is_some());

                let filtered = ListQueryBuilder::new(QueryConfig {
                    count_mode: CountMode::Filtered,
                    ..QueryConfig::default()
                })
                .execute(&collection, &params)
                .await
                .unwrap();
                assert_eq!(filtered.total, 4);
                assert!(filtered.pagination.next.is_none());
                assert!(filtered.pagination.prev.is_none());
            }

            #[tokio::test]
            async fn test_list_query_page_far_past_the_end() {
                let collection = seeded().await;
                let params = RawParameters::from_pairs([
                    ("page", "100000000000000000"),
                    ("limit", "100"),
                ]);

                let outcome = ListQueryBuilder::new(QueryConfig::default())
                    .execute(&collection, &params)
                    .await
                    .unwrap();

                assert!(outcome.items.is_empty());
                assert!(outcome.pagination.next.is_none());
            }

            #[tokio::test]
            async fn test_writes_reject_taken_names() {
                let collection = seeded().await;

                let err = collection.insert(numbered_food(3)).await.unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<FoodError>(),
                    Some(FoodError::AlreadyExists { name }) if name == "Food 03"
                ));

                let mut renamed = collection
                    .find_by_name("Food 04")
                    .await
                    .unwrap()
                    .expect("food should exist");
                renamed.name = "Food 05".to_string();
                let err = collection.replace(&renamed.id.clone(), renamed).await.unwrap_err();
                assert!(matches!(
                    err.downcast_ref::<FoodError>(),
                    Some(FoodError::AlreadyExists { .. })
                ));

                assert_eq!(collection.count().await.unwrap(), 12);
                assert!(collection.find_by_name("Food 04").await.unwrap().is_some());
            }

            #[tokio::test]
            async fn test_crud_operations() {
                let collection = $factory;
                let food = numbered_food(1);
                let id = food.id;

                let inserted = collection.insert(food.clone()).await.unwrap();
                assert_eq!(inserted.id, id);
                assert_eq!(inserted.name, "Food 01");

                let fetched = collection.get(&id).await.unwrap().expect("food should exist");
                assert_eq!(fetched.calories, Some(10));
                assert_eq!(
                    collection
                        .find_by_name("Food 01")
                        .await
                        .unwrap()
                        .map(|f| f.id),
                    Some(id)
                );
                assert!(collection.find_by_name("Food 99").await.unwrap().is_none());

                let mut renamed = fetched.clone();
                renamed.name = "Renamed".to_string();
                let replaced = collection
                    .replace(&id, renamed)
                    .await
                    .unwrap()
                    .expect("replace should find the food");
                assert_eq!(replaced.name, "Renamed");
                assert!(
                    collection
                        .replace(&uuid::Uuid::new_v4(), fetched)
                        .await
                        .unwrap()
                        .is_none()
                );

                assert!(collection.delete(&id).await.unwrap());
                assert!(!collection.delete(&id).await.unwrap());
                assert!(collection.get(&id).await.unwrap().is_none());
            }
        }
    };
}
