// Password hashing runs on the blocking pool so bcrypt never stalls the runtime

use crate::database::StoreError;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, StoreError> {
    let password: String = password.to_owned();
    let hashed: String = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, StoreError> {
    let password: String = password.to_owned();
    let hash: String = hash.to_owned();
    let matches: bool = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
    Ok(matches)
}

/// Same bcrypt work as a verify at `cost`, for logins that have no stored hash
pub async fn spend_verify_cost(password: &str, cost: u32) -> Result<(), StoreError> {
    hash_password(password, cost).await.map(drop)
}
