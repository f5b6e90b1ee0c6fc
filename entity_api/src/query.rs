use crate::{error::Error, QueryFilterMap, MAX_PAGE, PAGE_SIZE};
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, PrimaryKeyToColumn, QueryFilter,
    QueryOrder, Select,
};

/// Find all records of an entity by the given query filter map.
pub async fn find_by<E, C>(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator,
{
    Ok(filtered::<E, C>(&query_filter_map).all(db).await?)
}

/// Find one page of records of an entity by the given query filter map.
///
/// Pages are 1-based and hold at most [`PAGE_SIZE`] records. Records are ordered by
/// primary key so that consecutive pages never overlap.
pub async fn find_page_by<E, C>(
    db: &impl ConnectionTrait,
    query_filter_map: QueryFilterMap,
    page: u64,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    E::Model: Sync,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = filtered::<E, C>(&query_filter_map);
    for key in E::PrimaryKey::iter() {
        query = query.order_by_asc(key.into_column());
    }

    fetch_page(db, query, page).await
}

/// Fetch the given 1-based page of an already built query. Pages are clamped to
/// `1..=MAX_PAGE`.
pub async fn fetch_page<E>(
    db: &impl ConnectionTrait,
    query: Select<E>,
    page: u64,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait,
    E::Model: Sync,
{
    Ok(query
        .paginate(db, PAGE_SIZE)
        .fetch_page(page.clamp(1, MAX_PAGE) - 1)
        .await?)
}

fn filtered<E, C>(query_filter_map: &QueryFilterMap) -> Select<E>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    query
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use entity::annotations;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    #[tokio::test]
    async fn find_page_by_filters_known_columns_and_orders_by_primary_key() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<annotations::Model>::new()])
            .into_connection();

        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("project_id".to_string(), Some(Value::Int(Some(3))));
        query_filter_map.insert("not_a_column".to_string(), Some(Value::Int(Some(9))));

        let annotations =
            find_page_by::<annotations::Entity, annotations::Column>(&db, query_filter_map, 2)
                .await?;
        assert!(annotations.is_empty());

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("WHERE"));
        assert!(log.contains("project_id"));
        assert!(!log.contains("not_a_column"));
        assert!(log.contains("ORDER BY"));
        assert!(log.contains("LIMIT"));

        Ok(())
    }

    #[tokio::test]
    async fn fetch_page_treats_page_zero_as_the_first_page() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<annotations::Model>::new()])
            .into_connection();

        fetch_page(&db, annotations::Entity::find(), 0).await?;

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        assert!(format!("{:?}", log[0]).contains("OFFSET"));

        Ok(())
    }

    #[tokio::test]
    async fn fetch_page_clamps_huge_pages_instead_of_overflowing() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<annotations::Model>::new()])
            .into_connection();

        let page = fetch_page(&db, annotations::Entity::find(), u64::MAX).await?;

        assert!(page.is_empty());
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(&((MAX_PAGE - 1) * PAGE_SIZE).to_string()));

        Ok(())
    }
}
