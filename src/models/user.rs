use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User document stored in the `users` collection.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,  // always normalized (trimmed, lowercase)
    pub password: String,  // bcrypt hash
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    pub last_login: Option<i64>,
}

impl User {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Public view of a user, never carries the password hash.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_hex(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: Some(ObjectId::new()),
            email: "diver@oceanova.org".into(),
            password: "$2b$04$hash".into(),
            first_name: first.map(Into::into),
            last_name: last.map(Into::into),
            avatar: None,
            created_at: 0,
            last_login: None,
        }
    }

    #[test]
    fn display_name_joins_present_parts() {
        assert_eq!(user(Some("Sylvia"), Some("Earle")).display_name().as_deref(), Some("Sylvia Earle"));
        assert_eq!(user(None, Some("Earle")).display_name().as_deref(), Some("Earle"));
        assert_eq!(user(Some("  "), None).display_name(), None);
    }

    #[test]
    fn user_info_drops_password() {
        let u = user(Some("Sylvia"), None);
        let json = serde_json::to_value(UserInfo::from(&u)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["firstName"], "Sylvia");
        assert_eq!(json["id"], u.id_hex());
    }

    #[test]
    fn document_uses_camel_case_fields() {
        let doc = mongodb::bson::to_document(&user(Some("Sylvia"), Some("Earle"))).unwrap();
        assert!(doc.contains_key("_id"));
        assert!(doc.contains_key("firstName"));
        assert!(doc.contains_key("lastLogin"));
    }
}
