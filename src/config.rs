use std::path::PathBuf;

use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractors::Identity;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// The single privileged identity allowed to mutate the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub email: Option<String>,
    pub user_id: Option<Uuid>,
}

impl AdminConfig {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email.trim()))
    }

    pub fn is_admin(&self, identity: &Identity) -> bool {
        self.is_admin_email(&identity.email) || self.user_id == Some(identity.user_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    pub use_mock_data: bool,
    pub store_dir: Option<PathBuf>,
    pub seed_database: bool,
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "veggiedash".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "veggiedash-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let admin = AdminConfig {
            email: env_non_empty("ADMIN_EMAIL").map(|e| e.to_lowercase()),
            user_id: match env_non_empty("ADMIN_USER_ID") {
                Some(raw) => Some(Uuid::parse_str(&raw)?),
                None => None,
            },
        };
        if admin.email.is_none() && admin.user_id.is_none() {
            tracing::warn!("neither ADMIN_EMAIL nor ADMIN_USER_ID set; seller area is closed");
        }
        Ok(Self {
            database_url,
            jwt,
            admin,
            use_mock_data: env_flag("USE_MOCK_DATA"),
            store_dir: env_non_empty("STORE_DIR").map(PathBuf::from),
            seed_database: env_flag("SEED_DATABASE"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::UserRole;

    fn identity(email: &str, user_id: Uuid) -> Identity {
        Identity {
            user_id,
            email: email.into(),
            role: UserRole::Customer,
        }
    }

    #[test]
    fn admin_matches_configured_email_case_insensitively() {
        let admin = AdminConfig {
            email: Some("admin@veggiedash.test".into()),
            user_id: None,
        };
        assert!(admin.is_admin(&identity("Admin@VeggieDash.test", Uuid::new_v4())));
        assert!(!admin.is_admin(&identity("shopper@veggiedash.test", Uuid::new_v4())));
    }

    #[test]
    fn admin_matches_configured_user_id() {
        let id = Uuid::new_v4();
        let admin = AdminConfig {
            email: None,
            user_id: Some(id),
        };
        assert!(admin.is_admin(&identity("anyone@veggiedash.test", id)));
        assert!(!admin.is_admin(&identity("anyone@veggiedash.test", Uuid::new_v4())));
    }

    #[test]
    fn nobody_is_admin_without_configuration() {
        let admin = AdminConfig::default();
        assert!(!admin.is_admin(&identity("admin@veggiedash.test", Uuid::new_v4())));
        assert!(!admin.is_admin_email(""));
    }
}
