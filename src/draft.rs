//! # Signup Draft Store
//!
//! Auto-save for the signup form.
//!
//! ## Requirements
//!
//! - One fixed key holding the whole field-name to value(s) mapping
//! - Overwritten wholesale on every input event
//! - Read back once at page load to repopulate the form
//! - Cleared when a signup actually succeeds
//!
//! ## Implementation
//!
//! - Redis string under `signup:draft`, JSON-encoded
//! - Checkbox groups are multi-valued, so a field maps to one string or
//!   a list of strings; checked boxes carry the literal `"on"` sentinel

use std::{collections::BTreeMap, time::Duration};

use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DRAFT_KEY: &str = "signup:draft";

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).unwrap();

    client
        .get_connection_manager_with_config(config)
        .await
        .unwrap()
}

/// A saved form value: single for text inputs and selects, multiple for
/// checkbox groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    One(String),
    Many(Vec<String>),
}

pub type Draft = BTreeMap<String, FieldValue>;

pub async fn save_draft(connection: &mut ConnectionManager, draft: &Draft) -> Result<(), AppError> {
    let payload =
        serde_json::to_string(draft).map_err(|e| AppError::InternalError(Box::new(e)))?;

    let _: () = connection.set(DRAFT_KEY, payload).await?;

    Ok(())
}

pub async fn load_draft(connection: &mut ConnectionManager) -> Result<Option<Draft>, AppError> {
    let payload: Option<String> = connection.get(DRAFT_KEY).await?;

    match payload {
        Some(payload) => {
            let draft =
                serde_json::from_str(&payload).map_err(|_| AppError::MalformedPayload)?;

            Ok(Some(draft))
        }
        None => Ok(None),
    }
}

pub async fn clear_draft(connection: &mut ConnectionManager) -> Result<(), AppError> {
    let _: () = connection.del(DRAFT_KEY).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_json_shapes() {
        let mut draft = Draft::new();
        draft.insert("firstName".to_string(), FieldValue::One("Jane".to_string()));
        draft.insert(
            "interests".to_string(),
            FieldValue::Many(vec!["education".to_string(), "hunger".to_string()]),
        );
        draft.insert("newsletter".to_string(), FieldValue::One("on".to_string()));

        let json = serde_json::to_string(&draft).unwrap();
        assert_eq!(
            json,
            r#"{"firstName":"Jane","interests":["education","hunger"],"newsletter":"on"}"#
        );

        let back: Draft = serde_json::from_str(&json).unwrap();
        assert_eq!(back, draft);
    }
}
