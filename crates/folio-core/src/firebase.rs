//! Firebase REST wire formats: anonymous sign-up and Firestore documents.
//!
//! Only the shapes the guestbook needs are modelled; unknown fields are
//! ignored.

use crate::config::FirebaseConfig;
use crate::guestbook::GuestbookMessage;
use crate::store::{CollectionPath, NewMessage};
use crate::timestamp::Timestamp;
use fnv::FnvHashMap;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

pub const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
pub const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";
pub const LIST_PAGE_SIZE: u32 = 300;

const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const AUTO_ID_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document {doc} has no {field} field")]
    MissingField { doc: String, field: &'static str },
}

// ---------------- Auth ----------------

pub fn sign_up_url(config: &FirebaseConfig) -> String {
    format!(
        "{}/accounts:signUp?key={}",
        IDENTITY_TOOLKIT_BASE,
        encode_query_component(&config.api_key)
    )
}

pub fn sign_up_body() -> Value {
    json!({ "returnSecureToken": true })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub local_id: String,
    #[serde(default)]
    pub id_token: Option<String>,
}

// ---------------- Firestore ----------------

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: FnvHashMap<String, Value>,
}

impl Document {
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    fn string_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.get("stringValue")?.as_str()
    }

    fn timestamp_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.get("timestampValue")?.as_str()
    }
}

/// `projects/{project}/databases/(default)/documents`
pub fn documents_root(config: &FirebaseConfig) -> String {
    format!("projects/{}/databases/(default)/documents", config.project_id)
}

pub fn list_url(
    config: &FirebaseConfig,
    path: &CollectionPath,
    page_token: Option<&str>,
) -> String {
    let mut url = format!(
        "{}/{}{}?pageSize={}",
        FIRESTORE_BASE,
        documents_root(config),
        path,
        LIST_PAGE_SIZE
    );
    if let Some(token) = page_token {
        url.push_str("&pageToken=");
        url.push_str(&encode_query_component(token));
    }
    url
}

pub fn commit_url(config: &FirebaseConfig) -> String {
    format!("{}/{}:commit", FIRESTORE_BASE, documents_root(config))
}

/// Commit body that creates `doc_id` under `path` and stamps `timestamp` with
/// the server's request time.
pub fn commit_body(
    config: &FirebaseConfig,
    path: &CollectionPath,
    doc_id: &str,
    message: &NewMessage,
) -> Value {
    let name = format!("{}{}/{}", documents_root(config), path, doc_id);
    json!({
        "writes": [{
            "update": {
                "name": name,
                "fields": {
                    "message": { "stringValue": message.message },
                    "userId": { "stringValue": message.user_id.as_str() },
                }
            },
            "updateTransforms": [{
                "fieldPath": "timestamp",
                "setToServerValue": "REQUEST_TIME"
            }],
            "currentDocument": { "exists": false }
        }]
    })
}

pub fn decode_message(doc: &Document) -> Result<GuestbookMessage, DecodeError> {
    let message = doc
        .string_field("message")
        .ok_or_else(|| DecodeError::MissingField {
            doc: doc.id().to_string(),
            field: "message",
        })?;
    let timestamp = match doc.timestamp_field("timestamp") {
        Some(raw) => match Timestamp::parse_rfc3339(raw) {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("[guestbook] document {}: {}", doc.id(), e);
                None
            }
        },
        None => None,
    };
    Ok(GuestbookMessage {
        id: doc.id().to_string(),
        message: message.to_string(),
        user_id: doc.string_field("userId").map(str::to_string),
        timestamp,
    })
}

/// Decode one list page. Documents that are not guestbook messages are
/// skipped with a warning.
pub fn decode_list_page(
    body: &str,
) -> Result<(Vec<GuestbookMessage>, Option<String>), DecodeError> {
    let page: ListDocumentsResponse = serde_json::from_str(body)?;
    let mut out = Vec::with_capacity(page.documents.len());
    for doc in &page.documents {
        match decode_message(doc) {
            Ok(m) => out.push(m),
            Err(e) => log::warn!("[guestbook] skipping document: {}", e),
        }
    }
    let next = page.next_page_token.filter(|t| !t.is_empty());
    Ok((out, next))
}

pub fn decode_sign_up(body: &str) -> Result<SignUpResponse, DecodeError> {
    Ok(serde_json::from_str(body)?)
}

/// 20-character document id from the same alphabet the Firestore SDKs use
/// for auto ids.
pub fn auto_id<R: Rng>(rng: &mut R) -> String {
    (0..AUTO_ID_LEN)
        .map(|_| AUTO_ID_ALPHABET[rng.gen_range(0..AUTO_ID_ALPHABET.len())] as char)
        .collect()
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn encode_query_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
