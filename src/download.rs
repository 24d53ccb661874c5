//! Browser File Helpers
//!
//! Blob downloads and reading a picked file.

use js_sys::{Array, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::api::ApiError;

fn browser_err(context: &str, err: JsValue) -> ApiError {
    ApiError::Browser(format!("{}: {:?}", context, err))
}

/// Offer `bytes` as a file download named `file_name`.
pub fn save_bytes(file_name: &str, mime: &str, bytes: &[u8]) -> Result<(), ApiError> {
    let array = Uint8Array::from(bytes);
    let parts = Array::of1(&array.buffer());
    save_parts(file_name, mime, &parts)
}

pub fn save_text(file_name: &str, mime: &str, text: &str) -> Result<(), ApiError> {
    let parts = Array::of1(&JsValue::from_str(text));
    save_parts(file_name, mime, &parts)
}

fn save_parts(file_name: &str, mime: &str, parts: &Array) -> Result<(), ApiError> {
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(parts, &options)
        .map_err(|e| browser_err("blob", e))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| browser_err("object url", e))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ApiError::Browser("no document".to_string()))?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| browser_err("anchor", e))?
        .dyn_into()
        .map_err(|e| browser_err("anchor", e.into()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    let _ = web_sys::Url::revoke_object_url(&url);
    log::info!("[API] download offered: {}", file_name);
    Ok(())
}

/// Name and contents of a file chosen in an `<input type="file">`
pub async fn read_file(file: &web_sys::File) -> Result<(String, Vec<u8>), ApiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| browser_err("read file", e))?;
    Ok((file.name(), Uint8Array::new(&buffer).to_vec()))
}

/// First file of a file input, if anything was chosen
pub fn picked_file(input: &web_sys::HtmlInputElement) -> Option<web_sys::File> {
    input.files()?.get(0)
}
