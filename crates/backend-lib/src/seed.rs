// ============================
// crates/backend-lib/src/seed.rs
// ============================
//! Default user seeding for the API playground.
use crate::auth::hash_password;
use crate::error::AppError;
use crate::storage::Storage;

const DEFAULT_USERNAME: &str = "QualitySensei";
const DEFAULT_PASSWORD: &str = "12345678";

/// Create the default playground user unless it already exists.
pub async fn seed_default_user<S: Storage>(storage: &S) -> Result<(), AppError> {
    if storage
        .get_user_by_username(DEFAULT_USERNAME)
        .await?
        .is_some()
    {
        tracing::info!("default user already exists, skipping seed");
        return Ok(());
    }

    let hash = hash_password(DEFAULT_PASSWORD)?;
    match storage.create_user(DEFAULT_USERNAME.to_string(), hash).await? {
        Some(user) => {
            tracing::info!(user_id = user.id, username = DEFAULT_USERNAME, "default user created");
        },
        None => tracing::info!("default user already exists, skipping seed"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::storage::MemStorage;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let storage = MemStorage::new();
        seed_default_user(&storage).await.unwrap();
        seed_default_user(&storage).await.unwrap();

        let user = storage
            .get_user_by_username(DEFAULT_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, 1);
        assert!(verify_password(&user.password, DEFAULT_PASSWORD));
    }
}
