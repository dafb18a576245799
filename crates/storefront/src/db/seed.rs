//! Default store data and legacy record upgrades.
//!
//! A collection is seeded only if it has never been written: no records and
//! an untouched id counter. Emptying a collection through the API does not
//! bring the defaults back.
//!
//! Older stores kept account passwords in plaintext under `password`. Those
//! records are rehashed in place the first time the store is opened.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flatstore_core::models::{Category, Product, User};
use flatstore_core::{CategoryId, DiscountPercent, Price, ProductId, ProductStats, Role, UserId};

use super::{Collection, Database, RepositoryError, Table, WriteGuard};
use crate::services::auth::hash_password_blocking;

/// Default administrator account.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@store.kz";

/// Errors while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("could not hash an account password")]
    PasswordHash,
}

/// An account as written by older stores, with a plaintext password.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyUser {
    id: UserId,
    username: String,
    password: String,
    #[serde(default)]
    role: Role,
    #[serde(default)]
    email: String,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredUser {
    Current(User),
    Legacy(LegacyUser),
}

/// Write defaults into every never-written collection.
///
/// Legacy accounts are upgraded first, under the same locks.
/// Returns the collections that were seeded.
///
/// # Errors
///
/// Returns `SeedError::Repository` if a collection cannot be read or written.
pub async fn seed_defaults(db: &Database) -> Result<Vec<Collection>, SeedError> {
    let guard = db.begin(&Collection::ALL).await;
    upgrade_users(&guard).await?;

    let mut seeded = Vec::new();

    if let Some(products) = unwritten::<Product>(&guard, Collection::Products).await? {
        fill(&guard, products, default_products()).await?;
        seeded.push(Collection::Products);
    }
    if let Some(categories) = unwritten::<Category>(&guard, Collection::Categories).await? {
        fill(&guard, categories, default_categories()).await?;
        seeded.push(Collection::Categories);
    }
    if let Some(users) = unwritten::<User>(&guard, Collection::Users).await? {
        let password_hash = hash_password_blocking(DEFAULT_ADMIN_PASSWORD.to_owned())
            .await
            .map_err(|_| SeedError::PasswordHash)?;
        let admin = User {
            id: UserId::new(1),
            username: DEFAULT_ADMIN_USERNAME.to_owned(),
            password_hash,
            role: Role::Admin,
            email: DEFAULT_ADMIN_EMAIL.to_owned(),
            created_at: Utc::now(),
        };
        fill(&guard, users, vec![admin]).await?;
        seeded.push(Collection::Users);
    }

    if seeded.is_empty() {
        tracing::debug!("All collections already initialized");
    } else {
        tracing::info!(collections = ?seeded, "Seeded default data");
    }
    Ok(seeded)
}

/// Rehash plaintext passwords left by older stores.
///
/// Returns how many accounts were upgraded. The users collection is only
/// rewritten when there was something to upgrade.
///
/// # Errors
///
/// Returns `SeedError::Repository` if the users collection cannot be read or
/// written, or `SeedError::PasswordHash` if hashing fails.
pub async fn upgrade_legacy_users(db: &Database) -> Result<usize, SeedError> {
    let guard = db.begin(&[Collection::Users]).await;
    upgrade_users(&guard).await
}

async fn upgrade_users(guard: &WriteGuard<'_>) -> Result<usize, SeedError> {
    let stored = guard.load::<StoredUser>(Collection::Users).await?;
    let Table {
        collection,
        next_id,
        records,
    } = stored;

    if !records.iter().any(|record| matches!(record, StoredUser::Legacy(_))) {
        return Ok(0);
    }

    let mut upgraded = 0;
    let mut users = Vec::with_capacity(records.len());
    for record in records {
        match record {
            StoredUser::Current(user) => users.push(user),
            StoredUser::Legacy(legacy) => {
                let password_hash = hash_password_blocking(legacy.password)
                    .await
                    .map_err(|_| SeedError::PasswordHash)?;
                users.push(User {
                    id: legacy.id,
                    username: legacy.username,
                    password_hash,
                    role: legacy.role,
                    email: legacy.email,
                    created_at: legacy.created_at.unwrap_or_else(Utc::now),
                });
                upgraded += 1;
            }
        }
    }

    guard
        .save(&Table {
            collection,
            next_id,
            records: users,
        })
        .await?;

    tracing::warn!(count = upgraded, "Rehashed plaintext account passwords");
    Ok(upgraded)
}

async fn unwritten<T: DeserializeOwned>(
    guard: &WriteGuard<'_>,
    collection: Collection,
) -> Result<Option<Table<T>>, RepositoryError> {
    let table = guard.load::<T>(collection).await?;
    Ok((table.records().is_empty() && table.next_id() == 1).then_some(table))
}

async fn fill<T: Serialize>(
    guard: &WriteGuard<'_>,
    mut table: Table<T>,
    defaults: Vec<T>,
) -> Result<(), RepositoryError> {
    for record in defaults {
        table.allocate_id()?;
        table.records_mut().push(record);
    }
    guard.save(&table).await
}

fn default_categories() -> Vec<Category> {
    ["Электроника", "Одежда", "Книги"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
        })
        .collect()
}

fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new(1),
            name: "Смартфон".to_owned(),
            base_price: Price::from_units(150_000),
            category_id: CategoryId::new(1),
            description: "Современный смартфон".to_owned(),
            image: Some("/assets/phone.jpg".to_owned()),
            discount: DiscountPercent::NONE,
            stats: ProductStats::default(),
        },
        Product {
            id: ProductId::new(2),
            name: "Футболка".to_owned(),
            base_price: Price::from_units(5000),
            category_id: CategoryId::new(2),
            description: "Хлопковая футболка".to_owned(),
            image: Some("/assets/tshirt.jpg".to_owned()),
            discount: DiscountPercent::NONE,
            stats: ProductStats::default(),
        },
    ]
}
