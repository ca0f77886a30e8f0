use thiserror::Error;

/// Firebase web-app connection parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildProfile {
    Development,
    Release,
}

impl BuildProfile {
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildProfile::Development
        } else {
            BuildProfile::Release
        }
    }
}

/// How the guestbook should talk to its backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Every value was supplied; use Firebase.
    Firebase(FirebaseConfig),
    /// Development build without credentials. The placeholder config is kept
    /// for its `app_id` but nothing is sent over the network.
    Placeholder(FirebaseConfig),
}

impl Backend {
    pub fn config(&self) -> &FirebaseConfig {
        match self {
            Backend::Firebase(c) | Backend::Placeholder(c) => c,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing Firebase configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

pub const ENV_API_KEY: &str = "FIREBASE_API_KEY";
pub const ENV_AUTH_DOMAIN: &str = "FIREBASE_AUTH_DOMAIN";
pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const ENV_STORAGE_BUCKET: &str = "FIREBASE_STORAGE_BUCKET";
pub const ENV_MESSAGING_SENDER_ID: &str = "FIREBASE_MESSAGING_SENDER_ID";
pub const ENV_APP_ID: &str = "FIREBASE_APP_ID";

impl FirebaseConfig {
    pub fn placeholder() -> Self {
        Self {
            api_key: "AIzaSyDummyKeyDummyKeyDummyKeyDummyKeyDummy".into(),
            auth_domain: "dummy-project.firebaseapp.com".into(),
            project_id: "dummy-project".into(),
            storage_bucket: "dummy-project.appspot.com".into(),
            messaging_sender_id: "123456789012".into(),
            app_id: "1:123456789012:web:abc123def456".into(),
        }
    }

    /// Resolve the backend from named values. `lookup` returns `None` (or an
    /// empty string) for anything not set.
    pub fn resolve<F>(lookup: F, profile: BuildProfile) -> Result<Backend, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| match lookup(name).filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None => {
                missing.push(name);
                String::new()
            }
        };
        let config = Self {
            api_key: get(ENV_API_KEY),
            auth_domain: get(ENV_AUTH_DOMAIN),
            project_id: get(ENV_PROJECT_ID),
            storage_bucket: get(ENV_STORAGE_BUCKET),
            messaging_sender_id: get(ENV_MESSAGING_SENDER_ID),
            app_id: get(ENV_APP_ID),
        };
        if missing.is_empty() {
            return Ok(Backend::Firebase(config));
        }
        match profile {
            BuildProfile::Development => {
                log::warn!(
                    "[config] using placeholder Firebase config for development; set {} for a live guestbook",
                    missing.join(", ")
                );
                Ok(Backend::Placeholder(Self::placeholder()))
            }
            BuildProfile::Release => Err(ConfigError::Missing(missing)),
        }
    }
}
