use sea_orm::*;

use crate::entity::user_profile;
use crate::error::AppError;

/// Insert or update a user's contact info, keyed by their identity string.
pub async fn upsert_profile<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    location: &str,
    phone_number: &str,
) -> Result<(), AppError> {
    match user_profile::Entity::find_by_id(user_id.to_owned())
        .one(db)
        .await?
    {
        Some(existing) => {
            let mut row: user_profile::ActiveModel = existing.into();
            row.location = Set(location.to_string());
            row.phone_number = Set(phone_number.to_string());
            if row.is_changed() {
                row.update(db).await?;
            }
        }
        None => {
            let row = user_profile::ActiveModel {
                user_id: Set(user_id.to_string()),
                location: Set(location.to_string()),
                phone_number: Set(phone_number.to_string()),
                ..Default::default()
            };
            user_profile::Entity::insert(row)
                .exec_without_returning(db)
                .await?;
        }
    }
    Ok(())
}

/// Look up a user's contact info. Absence is not an error.
pub async fn get_profile<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<Option<user_profile::Model>, AppError> {
    Ok(user_profile::Entity::find_by_id(user_id.to_owned())
        .one(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: &str, location: &str) -> user_profile::Model {
        user_profile::Model {
            user_id: user_id.into(),
            location: location.into(),
            phone_number: "555-0100".into(),
        }
    }

    #[tokio::test]
    async fn upsert_inserts_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_profile::Model>::new()])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        upsert_profile(&db, "u1", "Library", "555-0100")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upsert_updates_in_place_when_present() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![profile("u1", "Library")]])
            .append_query_results([vec![profile("u1", "Student Union")]])
            .into_connection();

        upsert_profile(&db, "u1", "Student Union", "555-0100")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn get_profile_returns_none_when_absent() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user_profile::Model>::new()])
            .into_connection();

        assert!(get_profile(&db, "ghost").await.unwrap().is_none());
    }
}
