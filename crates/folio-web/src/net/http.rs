use folio_core::StoreError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(e: JsValue) -> StoreError {
    StoreError::Transport(format!("{:?}", e))
}

/// Send a JSON request and return the response body. Non-2xx statuses become
/// `StoreError::Http` carrying the body text.
pub async fn send_json(
    method: &str,
    url: &str,
    body: Option<&serde_json::Value>,
    bearer: Option<&str>,
) -> Result<String, StoreError> {
    let opts = web::RequestInit::new();
    opts.set_method(method);
    opts.set_mode(web::RequestMode::Cors);
    if let Some(b) = body {
        opts.set_body(&JsValue::from_str(&b.to_string()));
    }
    let request = web::Request::new_with_str_and_init(url, &opts).map_err(js_err)?;
    let headers = request.headers();
    if body.is_some() {
        headers.set("Content-Type", "application/json").map_err(js_err)?;
    }
    if let Some(token) = bearer {
        headers
            .set("Authorization", &format!("Bearer {}", token))
            .map_err(js_err)?;
    }

    let window = web::window().ok_or_else(|| StoreError::Transport("no window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?;
    let resp: web::Response = resp_value.dyn_into().map_err(js_err)?;
    let text = JsFuture::from(resp.text().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    let text = text.as_string().unwrap_or_default();
    if !resp.ok() {
        return Err(StoreError::Http {
            status: resp.status(),
            body: text,
        });
    }
    Ok(text)
}
