//! Helpers for the request urls the browser sends to the dev server.
//!
//! A module url is a root-relative path optionally followed by a query string,
//! e.g. `/src/style.css?inline`. Some query parameters only exist to defeat the
//! browser cache and carry no identity; those are listed in [CACHE_BUSTING_PARAMS].

/// `t` is the HMR timestamp, `import` marks a non-JS file imported from JS.
pub const CACHE_BUSTING_PARAMS: [&str; 2] = ["t", "import"];

const JS_EXTENSIONS: [&str; 8] = ["js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx"];

/// Strips both the query string and the hash fragment.
pub fn clean_url(url: &str) -> &str {
  let end = url.find(['?', '#']).unwrap_or(url.len());
  &url[..end]
}

/// Splits `url` into path and query, dropping any hash fragment.
pub fn split_query(url: &str) -> (&str, Option<&str>) {
  let url = url.split_once('#').map_or(url, |(before, _)| before);
  match url.split_once('?') {
    Some((path, query)) => (path, Some(query)),
    None => (url, None),
  }
}

/// Removes the given query parameters, keeping the others in their original order.
/// The hash fragment is dropped.
pub fn remove_query_params(url: &str, keys: &[&str]) -> String {
  let (path, query) = split_query(url);
  let Some(query) = query else {
    return path.to_string();
  };

  let kept = query
    .split('&')
    .filter(|pair| !pair.is_empty())
    .filter(|pair| {
      let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
      !keys.contains(&key)
    })
    .collect::<Vec<_>>();

  if kept.is_empty() {
    path.to_string()
  } else {
    format!("{path}?{}", kept.join("&"))
  }
}

/// The identity key of a module url: no hash, no cache-busting parameters.
pub fn canonicalize_url(url: &str) -> String {
  remove_query_params(url, &CACHE_BUSTING_PARAMS)
}

/// Appends `query` (`key` or `key=value`) to `url`, before any hash fragment.
pub fn inject_query(url: &str, query: &str) -> String {
  let (url, hash) = match url.split_once('#') {
    Some((url, hash)) => (url, Some(hash)),
    None => (url, None),
  };
  let separator = if url.contains('?') { '&' } else { '?' };
  match hash {
    Some(hash) => format!("{url}{separator}{query}#{hash}"),
    None => format!("{url}{separator}{query}"),
  }
}

pub fn has_query_param(url: &str, key: &str) -> bool {
  split_query(url).1.is_some_and(|query| {
    query.split('&').any(|pair| pair.split_once('=').map_or(pair, |(k, _)| k) == key)
  })
}

/// Extension of the path part of `url`, without the dot.
pub fn extension(url: &str) -> Option<&str> {
  let path = clean_url(url);
  let file_name = path.rsplit('/').next().unwrap_or(path);
  file_name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

pub fn is_js_request(url: &str) -> bool {
  extension(url).is_some_and(|ext| JS_EXTENSIONS.contains(&ext))
}

pub fn is_css_request(url: &str) -> bool {
  extension(url) == Some("css")
}

pub fn is_json_request(url: &str) -> bool {
  extension(url) == Some("json")
}

pub fn is_html_request(url: &str) -> bool {
  let path = clean_url(url);
  path.ends_with('/') || extension(path).is_some_and(|ext| ext == "html" || ext == "htm")
}

/// `http://`, `https://`, protocol-relative and `data:` urls never enter the module graph.
pub fn is_external_url(specifier: &str) -> bool {
  specifier.starts_with("http://")
    || specifier.starts_with("https://")
    || specifier.starts_with("//")
    || specifier.trim_start().starts_with("data:")
}

#[test]
fn test_clean_url() {
  assert_eq!(clean_url("/a.ts?t=1#x"), "/a.ts");
  assert_eq!(clean_url("/a.ts#x?y"), "/a.ts");
  assert_eq!(clean_url("/a.ts"), "/a.ts");
}

#[test]
fn test_canonicalize_url() {
  assert_eq!(canonicalize_url("/main.ts?t=1700000000"), "/main.ts");
  assert_eq!(canonicalize_url("/style.css?import&t=12"), "/style.css");
  assert_eq!(canonicalize_url("/style.css?t=12&inline"), "/style.css?inline");
  assert_eq!(canonicalize_url("/style.css?inline&import"), "/style.css?inline");
  assert_eq!(canonicalize_url("/a.ts?lang=ts&t=3#frag"), "/a.ts?lang=ts");
}

#[test]
fn test_inject_query() {
  assert_eq!(inject_query("/a.ts", "t=5"), "/a.ts?t=5");
  assert_eq!(inject_query("/a.css?inline", "t=5"), "/a.css?inline&t=5");
  assert_eq!(inject_query("/a.css#h", "import"), "/a.css?import#h");
}

#[test]
fn test_request_kinds() {
  assert!(is_js_request("/src/main.tsx?t=1"));
  assert!(!is_js_request("/src/style.css"));
  assert!(is_css_request("/src/style.css?inline"));
  assert!(is_json_request("/data.json"));
  assert!(is_html_request("/"));
  assert!(is_html_request("/nested/index.html"));
  assert!(has_query_param("/a.css?inline&x=1", "inline"));
  assert!(!has_query_param("/a.css?inlined", "inline"));
  assert_eq!(extension("/dir.v2/file"), None);
}
