use serde::{Deserialize, Serialize};

pub const PLACEHOLDER_TEACHER_NAME: &str = "Teacher";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Teacher {
    pub id: String, // Same id as the identity provider user
    pub email: String,
    pub full_name: String,
}

/// A user as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: Identity,
}

/// Result of a sign-up. The provider only opens a session right away when
/// email confirmation is turned off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub user: Identity,
    pub access_token: Option<String>,
}

impl Teacher {
    /// Builds a profile row for an identity that has none yet.
    pub fn from_identity(identity: &Identity) -> Self {
        let full_name = identity
            .user_metadata
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(PLACEHOLDER_TEACHER_NAME);

        Teacher {
            id: identity.id.clone(),
            email: identity.email.clone().unwrap_or_default(),
            full_name: full_name.to_string(),
        }
    }

    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: Option<&str>) -> Identity {
        Identity {
            id: "T1".to_string(),
            email: Some("t1@school.edu".to_string()),
            user_metadata: UserMetadata {
                full_name: name.map(str::to_string),
            },
        }
    }

    #[test]
    fn profile_from_identity_uses_metadata_name() {
        let teacher = Teacher::from_identity(&identity(Some("Grace Hopper")));

        assert_eq!(teacher.id, "T1");
        assert_eq!(teacher.email, "t1@school.edu");
        assert_eq!(teacher.full_name, "Grace Hopper");
        assert_eq!(teacher.first_name(), "Grace");
    }

    #[test]
    fn profile_from_identity_falls_back_to_placeholder() {
        assert_eq!(
            Teacher::from_identity(&identity(None)).full_name,
            PLACEHOLDER_TEACHER_NAME
        );
        assert_eq!(
            Teacher::from_identity(&identity(Some("   "))).full_name,
            PLACEHOLDER_TEACHER_NAME
        );
    }

    #[test]
    fn identity_without_metadata_deserializes() {
        let identity: Identity = serde_json::from_str(r#"{"id":"u-1"}"#).unwrap();
        assert_eq!(identity.email, None);
        assert_eq!(identity.user_metadata.full_name, None);
    }
}
