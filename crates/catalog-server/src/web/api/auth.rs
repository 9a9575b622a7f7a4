use axum::{extract::State, Json};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use catalog_common::models::auth::{IssuedToken, UserCredential};
use catalog_common::validation::{validate_credential, FieldError};
use catalog_db::AccountRepo;

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/auth/register
///
/// Creates the identity and immediately issues a token for it, so a
/// fresh registration is already an authenticated session.
#[tracing::instrument(skip(state, credential))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(credential): Json<UserCredential>,
) -> Result<Json<IssuedToken>, ApiError> {
    if let Err(errors) = validate_credential(&credential) {
        return Err(ApiError::validation(errors));
    }

    let email = credential.email.trim().to_lowercase();
    if AccountRepo::get_by_email(&state.pool, &email).await?.is_some() {
        return Err(duplicate_email());
    }

    let password_hash = hash_password(&credential.password)?;
    create_account(&state.pool, &email, &password_hash).await?;

    let issued = state.issuer.issue(&email)?;
    Ok(Json(issued))
}

fn duplicate_email() -> ApiError {
    ApiError::validation(vec![FieldError::new(
        "email",
        "email is already registered",
    )])
}

/// Inserts the account, translating a duplicate-email unique violation
/// into the same field error the pre-check produces. The pre-check in
/// `register` is only a fast path; the `account.email` unique
/// constraint is what actually arbitrates two concurrent registrations
/// of one email.
pub async fn create_account(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<(), ApiError> {
    AccountRepo::create(pool, Uuid::new_v4(), email, password_hash)
        .await
        .map_err(|e| {
            let duplicate = e
                .downcast_ref::<sqlx::Error>()
                .and_then(|e| e.as_database_error())
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                duplicate_email()
            } else {
                ApiError::Persistence(e)
            }
        })
}

/// POST /api/auth/login
///
/// Unknown account and wrong password take the same exit: the response
/// never says which factor failed.
#[tracing::instrument(skip(state, credential))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credential): Json<UserCredential>,
) -> Result<Json<IssuedToken>, ApiError> {
    let email = credential.email.trim().to_lowercase();

    let account = AccountRepo::get_by_email(&state.pool, &email)
        .await?
        .ok_or(ApiError::Auth)?;

    if !verify_password(&credential.password, &account.password_hash)? {
        return Err(ApiError::Auth);
    }

    let issued = state.issuer.issue(&account.email)?;
    Ok(Json(issued))
}
