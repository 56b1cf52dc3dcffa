use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use super::{
    dto::{PublicUser, RegisterRequest, RegisterResponse},
    password::hash_password,
    repo::{StoreError, UserStore},
    repo_types::NewUser,
    RegisterError,
};
use crate::validation;

pub const REGISTERED_MESSAGE: &str = "User registered successfully";

/// Registers a new user: uniqueness check, hash, insert.
///
/// The pre-check only spares the hashing cost on the common path. A duplicate
/// that slips past it is caught by the store and still reported as `Conflict`.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn register_user(
    store: &dyn UserStore,
    request: RegisterRequest,
) -> Result<RegisterResponse, RegisterError> {
    let RegisterRequest { email, password } = request;

    if let Err(errors) = validation::check_registration(&email, &password) {
        warn!(?errors, "registration rejected");
        return Err(RegisterError::Validation(errors));
    }

    match store.find_by_email(&email).await {
        Ok(Some(_)) => {
            warn!("email already registered");
            return Err(RegisterError::Conflict);
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(RegisterError::Internal(e.into()));
        }
    }

    let hashed = tokio::task::spawn_blocking(move || hash_password(&password)).await;
    let password_hash = match hashed {
        Ok(Ok(h)) => h,
        Ok(Err(e)) => {
            error!(error = %e, "hash_password failed");
            return Err(RegisterError::Internal(e));
        }
        Err(e) => {
            error!(error = %e, "hashing task failed");
            return Err(RegisterError::Internal(e.into()));
        }
    };

    let new_user = NewUser {
        email,
        password_hash,
        created_at: OffsetDateTime::now_utc(),
    };

    let user = match store.insert(new_user).await {
        Ok(u) => u,
        Err(StoreError::Duplicate) => {
            warn!("email registered concurrently");
            return Err(RegisterError::Conflict);
        }
        Err(e) => {
            error!(error = %e, "insert user failed");
            return Err(RegisterError::Internal(e.into()));
        }
    };

    info!(user_id = %user.id, "user registered");
    Ok(RegisterResponse {
        message: REGISTERED_MESSAGE.to_string(),
        user: PublicUser::from(user),
    })
}
