//! REST client for the remote category API
//!
//! All calls are blocking and run on background worker threads, never on the
//! UI thread (see `app::sync`).

use crate::constants::CATEGORIES_URL;
use crate::types::{Category, CategoryDraft};
use reqwest::blocking::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    Status(reqwest::StatusCode),
}

fn category_url(id: i64) -> String {
    format!("{}/{}", CATEGORIES_URL, id)
}

fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(response.status()))
    }
}

/// GET /categories - full collection
pub fn list(client: &Client) -> Result<Vec<Category>, ApiError> {
    let response = check(client.get(CATEGORIES_URL).send()?)?;
    Ok(response.json()?)
}

/// POST /categories - returns the stored record with its server-assigned id
pub fn create(client: &Client, draft: &CategoryDraft) -> Result<Category, ApiError> {
    let response = check(client.post(CATEGORIES_URL).json(draft).send()?)?;
    Ok(response.json()?)
}

/// PUT /categories/{id} - returns the updated record
pub fn update(client: &Client, id: i64, draft: &CategoryDraft) -> Result<Category, ApiError> {
    let response = check(client.put(category_url(id)).json(draft).send()?)?;
    Ok(response.json()?)
}

/// DELETE /categories/{id} - any 2xx counts as success, body ignored
pub fn delete(client: &Client, id: i64) -> Result<(), ApiError> {
    check(client.delete(category_url(id)).send()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_url_appends_id_to_collection_url() {
        assert_eq!(
            category_url(42),
            "https://api.escuelajs.co/api/v1/categories/42"
        );
    }
}
