use std::{path::PathBuf, time::Duration};

use hotpack_common::{DevOptions, NormalizedDevOptions};
use sugar_path::SugarPath;

pub fn normalize_options(raw_options: DevOptions) -> NormalizedDevOptions {
  let root = raw_options.root.unwrap_or_else(|| PathBuf::from(".")).absolutize();
  let in_root = |path: PathBuf| {
    if path.is_absolute() {
      path.normalize()
    } else {
      root.join(path).normalize()
    }
  };
  let config_file = raw_options.config_file.map(in_root);
  let fs_allow = std::iter::once(root.clone())
    .chain(raw_options.fs_allow.unwrap_or_default().into_iter().map(in_root))
    .collect();

  NormalizedDevOptions {
    root,
    host: raw_options.host.unwrap_or_else(|| "127.0.0.1".to_string()),
    port: raw_options.port.unwrap_or(5173),
    debounce: Duration::from_millis(raw_options.debounce_ms.unwrap_or(30)),
    client_buffer: raw_options.client_buffer.unwrap_or(64).max(1),
    ping_interval: Duration::from_millis(raw_options.ping_interval_ms.unwrap_or(30_000).max(1)),
    config_file,
    conditions: raw_options.conditions.unwrap_or_default(),
    fs_allow,
  }
}

#[test]
fn test_defaults() {
  let options = normalize_options(DevOptions {
    root: Some(PathBuf::from("/project")),
    config_file: Some(PathBuf::from("hotpack.json")),
    ..Default::default()
  });
  assert_eq!(options.root, PathBuf::from("/project"));
  assert_eq!(options.addr(), "127.0.0.1:5173");
  assert_eq!(options.debounce, Duration::from_millis(30));
  assert_eq!(options.client_buffer, 64);
  assert_eq!(options.ping_interval, Duration::from_secs(30));
  assert_eq!(options.config_file, Some(PathBuf::from("/project/hotpack.json")));
  assert!(options.is_config_file(&PathBuf::from("/project/hotpack.json")));
  assert_eq!(options.fs_allow, vec![PathBuf::from("/project")]);
}

#[test]
fn test_fs_allow() {
  let options = normalize_options(DevOptions {
    root: Some(PathBuf::from("/work/app")),
    fs_allow: Some(vec![PathBuf::from("../shared"), PathBuf::from("/opt/assets")]),
    ..Default::default()
  });
  assert_eq!(
    options.fs_allow,
    vec![PathBuf::from("/work/app"), PathBuf::from("/work/shared"), PathBuf::from("/opt/assets")]
  );
  assert!(options.is_fs_allowed(&PathBuf::from("/work/app/src/main.ts")));
  assert!(options.is_fs_allowed(&PathBuf::from("/work/shared/lib.js")));
  assert!(options.is_fs_allowed(&PathBuf::from("/work/node_modules/vue/index.js")));
  assert!(!options.is_fs_allowed(&PathBuf::from("/work/other/index.js")));
  assert!(!options.is_fs_allowed(&PathBuf::from("/home/user/.ssh/id_rsa")));
  assert!(!options.is_fs_allowed(&PathBuf::from("/work/application/secret.txt")));
}
