//! Per-session visitor identity.
//!
//! A [`SessionContext`] is built once during startup and handed to each
//! component that needs the current user id. There is no ambient lookup.

use rand::Rng;
use std::fmt;
use uuid::Builder;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentitySource {
    /// Uid issued by anonymous sign-in.
    Anonymous,
    /// Random id generated in the page because sign-in was unavailable.
    LocalFallback,
}

/// What the auth collaborator reported.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub uid: String,
    pub id_token: Option<String>,
}

#[derive(Clone, Debug)]
pub struct SessionContext {
    user_id: UserId,
    source: IdentitySource,
}

impl SessionContext {
    /// Build the session identity from the sign-in outcome. Anything other
    /// than a signed-in user with a non-empty uid falls back to a random id.
    pub fn resolve<E: fmt::Display, R: Rng>(
        auth: Result<Option<AuthUser>, E>,
        rng: &mut R,
    ) -> Self {
        match auth {
            Ok(Some(user)) if !user.uid.is_empty() => {
                log::info!("[auth] signed in anonymously as {}", user.uid);
                Self {
                    user_id: UserId(user.uid),
                    source: IdentitySource::Anonymous,
                }
            }
            Ok(_) => {
                log::warn!("[auth] no user after sign-in; using a local identity");
                Self::local(rng)
            }
            Err(e) => {
                log::error!("[auth] sign-in failed: {}", e);
                Self::local(rng)
            }
        }
    }

    pub fn local<R: Rng>(rng: &mut R) -> Self {
        Self {
            user_id: UserId(random_uuid_v4(rng)),
            source: IdentitySource::LocalFallback,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn source(&self) -> IdentitySource {
        self.source
    }
}

/// Random (version 4) UUID in hyphenated lowercase form.
pub fn random_uuid_v4<R: Rng>(rng: &mut R) -> String {
    Builder::from_random_bytes(rng.gen()).into_uuid().to_string()
}
