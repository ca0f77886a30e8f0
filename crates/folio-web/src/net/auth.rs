use super::http;
use folio_core::firebase::{decode_sign_up, sign_up_body, sign_up_url};
use folio_core::{AuthUser, FirebaseConfig};

/// Anonymous sign-in through the Identity Toolkit REST endpoint.
pub async fn sign_in_anonymously(config: &FirebaseConfig) -> anyhow::Result<Option<AuthUser>> {
    let body = http::send_json("POST", &sign_up_url(config), Some(&sign_up_body()), None).await?;
    let resp = decode_sign_up(&body)?;
    if resp.local_id.is_empty() {
        return Ok(None);
    }
    Ok(Some(AuthUser {
        uid: resp.local_id,
        id_token: resp.id_token,
    }))
}
