use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub name: String,
    pub password: String,
}

/// Response carrying a user's store-generated identifier. The id itself
/// is the capability the caller presents on subsequent calls.
#[derive(Debug, Serialize)]
pub struct UserIdResponse {
    pub id: Uuid,
}

/// Whether a list operation adds or removes an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListUpdate {
    Add,
    Remove,
}

/// Request body for the PUT list-mutation endpoints.
#[derive(Debug, Deserialize)]
pub struct ListUpdateRequest {
    pub update: ListUpdate,
}

/// The two per-user video lists.
#[derive(Debug, Serialize)]
pub struct UserDataResponse {
    pub likes: Vec<Uuid>,
    pub watch_later: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_update_accepts_add_and_remove() {
        let add: ListUpdateRequest = serde_json::from_str(r#"{"update":"add"}"#).unwrap();
        assert_eq!(add.update, ListUpdate::Add);
        let remove: ListUpdateRequest = serde_json::from_str(r#"{"update":"remove"}"#).unwrap();
        assert_eq!(remove.update, ListUpdate::Remove);
    }

    #[test]
    fn list_update_rejects_unknown_verbs() {
        assert!(serde_json::from_str::<ListUpdateRequest>(r#"{"update":"toggle"}"#).is_err());
        assert!(serde_json::from_str::<ListUpdateRequest>(r#"{"update":"Add"}"#).is_err());
        assert!(serde_json::from_str::<ListUpdateRequest>(r#"{}"#).is_err());
    }

    #[test]
    fn user_data_serializes_canonical_uuids() {
        let video = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        let data = UserDataResponse {
            likes: vec![video],
            watch_later: vec![],
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json["likes"][0],
            "11111111-1111-1111-1111-111111111111"
        );
        assert_eq!(json["watch_later"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn success_response_shape() {
        let json = serde_json::to_string(&SuccessResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }
}
