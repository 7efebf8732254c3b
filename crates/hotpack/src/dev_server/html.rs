use std::{path::Path, sync::LazyLock};

use hotpack_common::HMR_CLIENT_PATH;
use hotpack_utils::{path_ext::PathExt, url::is_external_url};
use regex::Regex;
use sugar_path::SugarPath;

static SCRIPT_TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>").unwrap());
static MODULE_TYPE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)\btype\s*=\s*["']?module\b"#).unwrap());
static SRC_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap());

/// Adds the HMR client to a page, before `</head>` or at the very top if the
/// page has no head.
pub fn inject_client_script(html: &str) -> String {
  let tag = format!("<script type=\"module\" src=\"{HMR_CLIENT_PATH}\"></script>");
  // ASCII lowercasing keeps byte offsets intact.
  match html.to_ascii_lowercase().find("</head>") {
    Some(index) => format!("{}{tag}{}", &html[..index], &html[index..]),
    None => format!("{tag}{html}"),
  }
}

/// Urls of the `<script type="module" src>` tags of the page at `page_url`.
/// Relative sources resolve against the page, external ones are skipped.
pub fn module_script_urls(html: &str, page_url: &str) -> Vec<String> {
  SCRIPT_TAG_RE
    .captures_iter(html)
    .filter_map(|tag| {
      let attrs = tag.get(1)?.as_str();
      if !MODULE_TYPE_RE.is_match(attrs) {
        return None;
      }
      let src = SRC_RE.captures(attrs)?;
      let src = src.get(1).or_else(|| src.get(2)).or_else(|| src.get(3))?.as_str().trim();
      if src.is_empty() || is_external_url(src) {
        return None;
      }
      if src.starts_with('/') {
        return Some(src.to_string());
      }
      let page_dir = &page_url[..=page_url.rfind('/')?];
      Some(Path::new(page_dir).join(src).normalize().expect_to_slash())
    })
    .filter(|url| url != HMR_CLIENT_PATH)
    .collect()
}

#[test]
fn test_module_script_urls() {
  let html = r#"<html><head>
<script type="module" src="/src/main.ts"></script>
<script type='module' src='./widgets/chart.js?v=2'></script>
<SCRIPT TYPE=module SRC=../shared.js></SCRIPT>
<script src="/legacy.js"></script>
<script type="module" src="https://cdn.example.com/lib.js"></script>
<script type="module">console.log('inline');</script>
</head></html>"#;
  assert_eq!(
    module_script_urls(html, "/pages/index.html"),
    vec!["/src/main.ts", "/pages/widgets/chart.js?v=2", "/shared.js"]
  );
  assert!(module_script_urls(&inject_client_script("<head></head>"), "/").is_empty());
}

#[test]
fn test_inject_client_script() {
  assert_eq!(
    inject_client_script("<html><HEAD><title>x</title></HEAD><body></body></html>"),
    "<html><HEAD><title>x</title><script type=\"module\" src=\"/@hotpack/client\"></script></HEAD><body></body></html>"
  );
  assert_eq!(
    inject_client_script("<div></div>"),
    "<script type=\"module\" src=\"/@hotpack/client\"></script><div></div>"
  );
}
