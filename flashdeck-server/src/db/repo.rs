//! Generic repository over a session-scoped connection
//!
//! One repository instance per entity type per request. SQL is assembled
//! from [`Entity`] metadata with `QueryBuilder`; values are always bound,
//! never interpolated.

use std::marker::PhantomData;

use sqlx::{Postgres, QueryBuilder, Row};

use super::entity::Entity;
use super::session::Session;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{table} row {id} does not exist")]
    MissingRow { table: &'static str, id: i64 },

    #[error("{table} instance has no id")]
    MissingId { table: &'static str },

    #[error("unknown relation '{relation}' on {table}")]
    UnknownRelation {
        table: &'static str,
        relation: &'static str,
    },
}

/// An equality criterion value for [`Repo::filter`].
#[derive(Debug, Clone)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

/// Data access for one entity type, bound to a request's session.
pub struct Repo<'s, T: Entity> {
    session: &'s mut Session,
    _entity: PhantomData<T>,
}

impl<'s, T: Entity> Repo<'s, T> {
    pub fn new(session: &'s mut Session) -> Self {
        Self {
            session,
            _entity: PhantomData,
        }
    }

    /// Every persisted row, ordered by id.
    pub async fn all(&mut self) -> Result<Vec<T>, DbError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            select_list::<T>(),
            T::TABLE
        );
        Ok(sqlx::query_as::<_, T>(&sql)
            .fetch_all(self.session.conn())
            .await?)
    }

    /// Fetch one row by primary key; `None` when no row matches.
    ///
    /// Each relation named in `prefetch` is loaded alongside and attached to
    /// the returned instance. Naming a relation the entity does not declare
    /// is an error.
    pub async fn get_by_id(
        &mut self,
        id: i64,
        prefetch: &[&'static str],
    ) -> Result<Option<T>, DbError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            select_list::<T>(),
            T::TABLE
        );
        let Some(mut instance) = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(self.session.conn())
            .await?
        else {
            return Ok(None);
        };

        for &name in prefetch {
            let Some(relation) = T::RELATIONS.iter().find(|r| r.name == name) else {
                return Err(DbError::UnknownRelation {
                    table: T::TABLE,
                    relation: name,
                });
            };
            let sql = format!(
                "SELECT * FROM {} WHERE {} = $1 ORDER BY id",
                relation.table, relation.foreign_key
            );
            let rows = sqlx::query(&sql)
                .bind(id)
                .fetch_all(self.session.conn())
                .await?;
            instance.attach_related(relation.name, rows)?;
        }

        Ok(Some(instance))
    }

    /// Rows matching every criterion by equality, AND-combined.
    pub async fn filter(
        &mut self,
        criteria: &[(&'static str, FilterValue)],
    ) -> Result<Vec<T>, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM {}",
            select_list::<T>(),
            T::TABLE
        ));
        if !criteria.is_empty() {
            qb.push(" WHERE ");
            let mut clause = qb.separated(" AND ");
            for (column, value) in criteria {
                clause.push(*column);
                clause.push_unseparated(" = ");
                match value {
                    FilterValue::Int(v) => clause.push_bind_unseparated(*v),
                    FilterValue::Text(v) => clause.push_bind_unseparated(v.clone()),
                };
            }
        }
        qb.push(" ORDER BY id");
        Ok(qb
            .build_query_as::<T>()
            .fetch_all(self.session.conn())
            .await?)
    }

    /// Persist the instance: insert when it has no id (populating it),
    /// otherwise write the full non-id column set keyed by the id.
    pub async fn save(&mut self, instance: &mut T) -> Result<(), DbError> {
        match instance.id() {
            None => self.insert(instance).await,
            Some(id) => {
                let mut qb = update_query(instance, id);
                let result = qb.build().execute(self.session.conn()).await?;
                if result.rows_affected() == 0 {
                    return Err(DbError::MissingRow {
                        table: T::TABLE,
                        id,
                    });
                }
                Ok(())
            }
        }
    }

    /// Insert all instances in one statement; ids are written back in input
    /// order.
    pub async fn bulk_create(&mut self, instances: &mut [T]) -> Result<(), DbError> {
        if instances.is_empty() {
            return Ok(());
        }
        let mut qb = insert_query(instances.iter());
        let rows = qb.build().fetch_all(self.session.conn()).await?;
        for (instance, row) in instances.iter_mut().zip(rows) {
            instance.set_id(row.try_get("id")?);
        }
        Ok(())
    }

    /// Persist each instance's full attribute set keyed by its id, inside
    /// one transaction. An id with no matching row aborts and rolls back the
    /// whole batch.
    pub async fn bulk_update(&mut self, instances: &[T]) -> Result<(), DbError> {
        let mut tx = self.session.begin().await?;
        for instance in instances {
            let Some(id) = instance.id() else {
                return Err(DbError::MissingId { table: T::TABLE });
            };
            let mut qb = update_query(instance, id);
            let result = qb.build().execute(&mut *tx).await?;
            if result.rows_affected() == 0 {
                return Err(DbError::MissingRow {
                    table: T::TABLE,
                    id,
                });
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert(&mut self, instance: &mut T) -> Result<(), DbError> {
        let mut qb = insert_query(std::iter::once(&*instance));
        let row = qb.build().fetch_one(self.session.conn()).await?;
        instance.set_id(row.try_get("id")?);
        Ok(())
    }
}

/// `id` plus the entity's insertable columns, for SELECT lists.
fn select_list<T: Entity>() -> String {
    let mut columns = Vec::with_capacity(T::COLUMNS.len() + 1);
    columns.push("id");
    columns.extend_from_slice(T::COLUMNS);
    columns.join(", ")
}

fn insert_query<'a, T: Entity + 'a>(
    instances: impl Iterator<Item = &'a T>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        T::TABLE,
        T::COLUMNS.join(", ")
    ));
    qb.push_values(instances, |mut row, instance| {
        instance.push_column_values(&mut row);
    });
    qb.push(" RETURNING id");
    qb
}

fn update_query<T: Entity>(instance: &T, id: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "UPDATE {} SET ({}) = ROW(",
        T::TABLE,
        T::COLUMNS.join(", ")
    ));
    {
        let mut row = qb.separated(", ");
        instance.push_column_values(&mut row);
    }
    qb.push(") WHERE id = ");
    qb.push_bind(id);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Deck};

    #[test]
    fn select_list_leads_with_id() {
        assert_eq!(select_list::<Deck>(), "id, name, description");
        assert_eq!(select_list::<Card>(), "id, front, back, hint, deck_id");
    }

    #[test]
    fn update_query_shape() {
        let deck = Deck {
            id: Some(7),
            name: "Spanish".into(),
            description: None,
            cards: Vec::new(),
        };
        let qb = update_query(&deck, 7);
        assert_eq!(
            qb.sql(),
            "UPDATE decks SET (name, description) = ROW($1, $2) WHERE id = $3"
        );
    }

    #[test]
    fn insert_query_shape() {
        let deck = Deck {
            id: None,
            name: "Spanish".into(),
            description: None,
            cards: Vec::new(),
        };
        let qb = insert_query(std::iter::once(&deck));
        assert_eq!(
            qb.sql(),
            "INSERT INTO decks (name, description) VALUES ($1, $2) RETURNING id"
        );
    }

    // Integration tests - run with DATABASE_URL set
    // cargo test -p flashdeck-server -- --ignored

    async fn test_session() -> Session {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");
        crate::db::migrations::run(&pool).await.expect("migrations failed");
        Session::acquire(&pool).await.expect("session acquisition failed")
    }

    fn deck(name: &str) -> Deck {
        Deck {
            id: None,
            name: name.into(),
            description: None,
            cards: Vec::new(),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn save_assigns_id_and_roundtrips() {
        let mut session = test_session().await;
        let mut repo = session.repo::<Deck>();

        let mut created = deck("repo-roundtrip");
        repo.save(&mut created).await.expect("insert failed");
        let id = created.id.expect("id not assigned");
        assert!(id > 0);

        let fetched = repo
            .get_by_id(id, &[])
            .await
            .expect("get failed")
            .expect("row missing");
        assert_eq!(fetched.name, "repo-roundtrip");
        assert_eq!(fetched.description, None);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_by_id_missing_is_none() {
        let mut session = test_session().await;
        let found = session
            .repo::<Deck>()
            .get_by_id(i64::MAX, &[])
            .await
            .expect("get failed");
        assert!(found.is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_by_id_unknown_relation_is_error() {
        let mut session = test_session().await;
        let mut repo = session.repo::<Deck>();

        let mut created = deck("repo-unknown-relation");
        repo.save(&mut created).await.expect("insert failed");

        let err = repo
            .get_by_id(created.id.unwrap(), &["nope"])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnknownRelation { .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn bulk_create_assigns_ids_in_order() {
        let mut session = test_session().await;
        let mut owner = deck("repo-bulk-create");
        session.repo::<Deck>().save(&mut owner).await.expect("insert failed");
        let deck_id = owner.id.unwrap();

        let mut cards: Vec<Card> = (0..3)
            .map(|i| Card {
                id: None,
                front: format!("front-{i}"),
                back: None,
                hint: None,
                deck_id: Some(deck_id),
            })
            .collect();
        session
            .repo::<Card>()
            .bulk_create(&mut cards)
            .await
            .expect("bulk create failed");

        let ids: Vec<i64> = cards.iter().map(|c| c.id.expect("id not assigned")).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn bulk_update_missing_row_rolls_back() {
        let mut session = test_session().await;
        let mut owner = deck("repo-bulk-rollback");
        session.repo::<Deck>().save(&mut owner).await.expect("insert failed");
        let deck_id = owner.id.unwrap();

        let mut cards = vec![Card {
            id: None,
            front: "before".into(),
            back: None,
            hint: None,
            deck_id: Some(deck_id),
        }];
        session
            .repo::<Card>()
            .bulk_create(&mut cards)
            .await
            .expect("bulk create failed");
        let good_id = cards[0].id.unwrap();

        let batch = vec![
            Card {
                id: Some(good_id),
                front: "after".into(),
                back: None,
                hint: None,
                deck_id: Some(deck_id),
            },
            Card {
                id: Some(i64::MAX),
                front: "ghost".into(),
                back: None,
                hint: None,
                deck_id: Some(deck_id),
            },
        ];
        let err = session
            .repo::<Card>()
            .bulk_update(&batch)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingRow { .. }));

        // The first update must have been rolled back with the batch.
        let unchanged = session
            .repo::<Card>()
            .get_by_id(good_id, &[])
            .await
            .expect("get failed")
            .expect("row missing");
        assert_eq!(unchanged.front, "before");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn filter_matches_by_equality() {
        let mut session = test_session().await;
        let mut owner = deck("repo-filter");
        session.repo::<Deck>().save(&mut owner).await.expect("insert failed");
        let deck_id = owner.id.unwrap();

        let mut cards = vec![
            Card {
                id: None,
                front: "a".into(),
                back: None,
                hint: None,
                deck_id: Some(deck_id),
            },
            Card {
                id: None,
                front: "b".into(),
                back: None,
                hint: None,
                deck_id: Some(deck_id),
            },
        ];
        session
            .repo::<Card>()
            .bulk_create(&mut cards)
            .await
            .expect("bulk create failed");

        let matched = session
            .repo::<Card>()
            .filter(&[("deck_id", FilterValue::Int(deck_id))])
            .await
            .expect("filter failed");
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|c| c.deck_id == Some(deck_id)));
    }
}
