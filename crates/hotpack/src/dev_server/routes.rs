use std::{io, path::PathBuf, sync::Arc};

use axum::{
  extract::{State, WebSocketUpgrade},
  http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
  response::{IntoResponse, Response},
  Json,
};
use hotpack_common::HMR_WS_PATH;
use hotpack_utils::{
  path_ext::FS_PREFIX,
  url::{clean_url, extension, has_query_param, is_html_request, is_js_request},
};
use sugar_path::SugarPath;

use super::{
  html::{inject_client_script, module_script_urls},
  AppState,
};
use crate::{hmr::serve_socket, plugins::ID_PREFIX};

const CLIENT_SCRIPT: &str = include_str!("../client/client.js");

pub(super) async fn hmr_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
  let hmr = Arc::clone(&state.ctx.hmr);
  let ping_interval = state.ctx.options.ping_interval;
  ws.on_upgrade(move |socket| serve_socket(socket, hmr, ping_interval))
}

pub(super) async fn hmr_client() -> Response {
  let script = CLIENT_SCRIPT.replace("__HMR_WS_PATH__", HMR_WS_PATH);
  javascript_response(script, None)
}

/// Everything that is neither the socket nor the client: pages, modules and
/// plain files.
pub(super) async fn serve_request(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> Response {
  let raw_url = uri.path_and_query().map_or_else(|| uri.path(), |path_and_query| path_and_query.as_str());

  if is_html_request(raw_url) {
    return serve_html(&state, raw_url);
  }
  if is_module_request(raw_url) {
    return serve_module(&state, raw_url, &headers).await;
  }
  serve_static(&state, raw_url)
}

/// Requests the dev server compiles before answering.
pub fn is_module_request(url: &str) -> bool {
  is_js_request(url)
    || has_query_param(url, "import")
    || has_query_param(url, "inline")
    || url.starts_with(ID_PREFIX)
}

async fn serve_module(state: &AppState, raw_url: &str, headers: &HeaderMap) -> Response {
  match state.transform_handler.transform_request(raw_url).await {
    Ok(result) => {
      let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|value| value.as_bytes() == result.etag.as_bytes());
      if not_modified {
        let mut headers = HeaderMap::new();
        insert_etag(&mut headers, &result.etag);
        return (StatusCode::NOT_MODIFIED, headers).into_response();
      }
      javascript_response(result.code_with_sourcemap(), Some(&result.etag))
    }
    Err(err) if err.is_not_found() => (StatusCode::NOT_FOUND, err.message).into_response(),
    Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, Json(err.to_json_body())).into_response(),
  }
}

fn serve_html(state: &AppState, raw_url: &str) -> Response {
  let mut path = clean_url(raw_url).to_string();
  if path.ends_with('/') {
    path.push_str("index.html");
  }
  let Some(file) = file_for_url(state, &path) else {
    return StatusCode::NOT_FOUND.into_response();
  };
  match state.ctx.fs.read_to_string(&file) {
    Ok(html) => {
      for script_url in module_script_urls(&html, &path) {
        state.ctx.graph.mark_entry(&state.ctx.graph.resolve_url(&script_url));
      }
      let mut headers = HeaderMap::new();
      headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
      headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
      (StatusCode::OK, headers, inject_client_script(&html)).into_response()
    }
    Err(err) => io_error_response(&err),
  }
}

fn serve_static(state: &AppState, raw_url: &str) -> Response {
  let path = clean_url(raw_url);
  let Some(file) = file_for_url(state, path) else {
    return StatusCode::NOT_FOUND.into_response();
  };
  match state.ctx.fs.read(&file) {
    Ok(bytes) => {
      let mut headers = HeaderMap::new();
      if let Ok(content_type) = HeaderValue::from_str(content_type(path).as_ref()) {
        headers.insert(header::CONTENT_TYPE, content_type);
      }
      (StatusCode::OK, headers, bytes).into_response()
    }
    Err(err) => io_error_response(&err),
  }
}

/// Maps an url path to a file inside the root, or through `/@fs/` to a file in
/// one of the allowed directories.
fn file_for_url(state: &AppState, path: &str) -> Option<PathBuf> {
  let options = &state.ctx.options;
  if let Some(absolute) = path.strip_prefix(FS_PREFIX) {
    let file = PathBuf::from(format!("/{absolute}")).normalize();
    if !options.is_fs_allowed(&file) {
      tracing::warn!("refused to serve {}, it is outside the allowed directories", file.display());
      return None;
    }
    return Some(file);
  }
  let file = options.root.join(path.trim_start_matches('/')).normalize();
  file.starts_with(&options.root).then_some(file)
}

fn content_type(path: &str) -> mime::Mime {
  match extension(path) {
    Some("html" | "htm") => mime::TEXT_HTML_UTF_8,
    Some("css") => mime::TEXT_CSS_UTF_8,
    Some("js" | "mjs") => mime::APPLICATION_JAVASCRIPT_UTF_8,
    Some("json" | "map") => mime::APPLICATION_JSON,
    Some("svg") => mime::IMAGE_SVG,
    Some("png") => mime::IMAGE_PNG,
    Some("jpg" | "jpeg") => mime::IMAGE_JPEG,
    Some("gif") => mime::IMAGE_GIF,
    Some("woff") => mime::FONT_WOFF,
    Some("woff2") => mime::FONT_WOFF2,
    Some("txt") => mime::TEXT_PLAIN_UTF_8,
    _ => mime::APPLICATION_OCTET_STREAM,
  }
}

fn javascript_response(code: String, etag: Option<&str>) -> Response {
  let mut headers = HeaderMap::new();
  headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/javascript"));
  headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
  if let Some(etag) = etag {
    insert_etag(&mut headers, etag);
  }
  (StatusCode::OK, headers, code).into_response()
}

fn insert_etag(headers: &mut HeaderMap, etag: &str) {
  if let Ok(value) = HeaderValue::from_str(etag) {
    headers.insert(header::ETAG, value);
  }
}

fn io_error_response(err: &io::Error) -> Response {
  match err.kind() {
    io::ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
    _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
  }
}

#[test]
fn test_is_module_request() {
  assert!(is_module_request("/src/main.ts"));
  assert!(is_module_request("/src/style.css?import"));
  assert!(is_module_request("/src/style.css?inline&t=3"));
  assert!(is_module_request("/@id/__x00__virtual:env"));
  assert!(!is_module_request("/src/style.css"));
  assert!(!is_module_request("/logo.png"));
}
