use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record proves its password.
///
/// `Legacy` only ever comes from stored data written before salted hashing;
/// new accounts are always `Salted`. The only transition is
/// `Legacy -> Salted`, taken on the first successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Legacy { encoded: String },
    Salted { hash: String, salt: String },
}

impl Credential {
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredUser", into = "StoredUser")]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    /// `None` when the stored record carried neither credential form.
    pub credential: Option<Credential>,
    pub role: Role,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Persisted layout, with credentials keyed by field presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    legacy_password: Option<String>,
    #[serde(default = "default_role")]
    role: Role,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

const fn default_role() -> Role {
    Role::User
}

impl From<StoredUser> for UserRecord {
    fn from(stored: StoredUser) -> Self {
        // Salted form wins when both are present; the legacy field is
        // dropped on the next write.
        let credential = match (stored.password_hash, stored.salt, stored.legacy_password) {
            (Some(hash), Some(salt), _) => Some(Credential::Salted { hash, salt }),
            (_, _, Some(encoded)) => Some(Credential::Legacy { encoded }),
            _ => None,
        };

        Self {
            email: stored.email,
            name: stored.name,
            credential,
            role: stored.role,
            disabled: stored.disabled,
            created_at: stored.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            last_login_at: stored.last_login_at,
        }
    }
}

impl From<UserRecord> for StoredUser {
    fn from(user: UserRecord) -> Self {
        let (password_hash, salt, legacy_password) = match user.credential {
            Some(Credential::Salted { hash, salt }) => (Some(hash), Some(salt), None),
            Some(Credential::Legacy { encoded }) => (None, None, Some(encoded)),
            None => (None, None, None),
        };

        Self {
            email: user.email,
            name: user.name,
            password_hash,
            salt,
            legacy_password,
            role: user.role,
            disabled: user.disabled,
            created_at: Some(user.created_at),
            last_login_at: user.last_login_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salted_record_uses_portal_field_names() {
        let user = UserRecord {
            email: "ada@alumni.example".to_string(),
            name: "Ada".to_string(),
            credential: Some(Credential::Salted {
                hash: "ab".to_string(),
                salt: "cd".to_string(),
            }),
            role: Role::User,
            disabled: false,
            created_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["passwordHash"], "ab");
        assert_eq!(json["salt"], "cd");
        assert_eq!(json["role"], "user");
        assert!(json.get("legacyPassword").is_none());
        assert!(json.get("lastLoginAt").is_none());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_legacy_record_from_portal_json() {
        let json = r#"{"email":"old@alumni.example","name":"Old","legacyPassword":"U2VjcmV0MQ==","role":"user","disabled":false,"createdAt":"2023-05-01T10:00:00Z"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(
            user.credential,
            Some(Credential::Legacy {
                encoded: "U2VjcmV0MQ==".to_string()
            })
        );
        assert_eq!(user.created_at.to_rfc3339(), "2023-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_salted_form_wins_over_legacy() {
        let json = r#"{"email":"mixed@alumni.example","passwordHash":"ab","salt":"cd","legacyPassword":"eA=="}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert!(matches!(user.credential, Some(Credential::Salted { .. })));

        let back = serde_json::to_value(&user).unwrap();
        assert!(back.get("legacyPassword").is_none());
    }

    #[test]
    fn test_record_without_credential_loads_as_none() {
        let json = r#"{"email":"broken@alumni.example","name":"Broken","role":"admin"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert!(user.credential.is_none());
        assert!(user.is_admin());
        assert!(!user.disabled);
    }
}
