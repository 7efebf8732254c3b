#![allow(dead_code)]

use std::{
  borrow::Cow,
  path::{Path, PathBuf},
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  },
  time::Duration,
};

use hotpack::{
  BuildResult, DevOptions, DevServer, FsEvent, FsEventKind, HmrPayload, HookLoadArgs,
  HookLoadReturn, HookTransformArgs, HookTransformReturn, HookUsage, ModuleInfo, Plugin,
  PluginContext, SharedPlugin, TransformResult,
};
use hotpack_fs::{MemoryFileSystem, SharedFileSystem};
use tokio::sync::mpsc::Receiver;

pub const ROOT: &str = "/project";

pub struct Fixture {
  pub server: DevServer,
  pub fs: Arc<MemoryFileSystem>,
}

pub fn fixture(files: &[(&str, &str)]) -> Fixture {
  fixture_with(files, Vec::new(), DevOptions::default())
}

/// `files` are relative to [ROOT], e.g. `/src/main.ts`.
pub fn fixture_with(files: &[(&str, &str)], plugins: Vec<SharedPlugin>, options: DevOptions) -> Fixture {
  let fs = Arc::new(MemoryFileSystem::default());
  for (path, content) in files {
    fs.add_file(&abs(path), content);
  }
  let options = DevOptions { root: Some(PathBuf::from(ROOT)), ..Default::default() }.merge(options);
  let shared_fs: SharedFileSystem = Arc::clone(&fs) as SharedFileSystem;
  Fixture { server: DevServer::with_fs(options, plugins, shared_fs), fs }
}

pub fn abs(path: &str) -> PathBuf {
  Path::new(ROOT).join(path.trim_start_matches('/'))
}

impl Fixture {
  pub async fn request(&self, url: &str) -> BuildResult<Arc<TransformResult>> {
    self.server.transform_handler().transform_request(url).await
  }

  pub fn module(&self, url: &str) -> ModuleInfo {
    self.server.graph().get_module_by_url(url).unwrap_or_else(|| panic!("{url} is not in the graph"))
  }

  pub fn write(&self, path: &str, content: &str) {
    self.fs.add_file(&abs(path), content);
  }

  pub async fn edit(&self, path: &str, content: &str) -> Option<HmrPayload> {
    self.write(path, content);
    self.event(path, FsEventKind::Change).await
  }

  pub async fn event(&self, path: &str, kind: FsEventKind) -> Option<HmrPayload> {
    self.server.bridge().handle_file_change(&FsEvent::new(abs(path), kind)).await
  }

  /// Connects a fake client and consumes its `connected` message.
  pub async fn client(&self) -> Receiver<Arc<str>> {
    let (_, mut rx) = self.server.hmr().connect();
    let connected = rx.recv().await.expect("connected message");
    assert_eq!(&*connected, r#"{"type":"connected"}"#);
    rx
  }
}

/// Every message queued for `rx` so far.
pub fn drain(rx: &mut Receiver<Arc<str>>) -> Vec<serde_json::Value> {
  let mut messages = Vec::new();
  while let Ok(message) = rx.try_recv() {
    messages.push(serde_json::from_str(&message).expect("valid json"));
  }
  messages
}

/// Counts hook calls without changing anything.
#[derive(Default)]
pub struct CountingPlugin {
  pub loads: AtomicUsize,
  pub transforms: AtomicUsize,
  pub load_delay: Duration,
}

impl CountingPlugin {
  pub fn with_delay(load_delay: Duration) -> Arc<Self> {
    Arc::new(Self { load_delay, ..Default::default() })
  }

  pub fn loads(&self) -> usize {
    self.loads.load(Ordering::SeqCst)
  }

  pub fn transforms(&self) -> usize {
    self.transforms.load(Ordering::SeqCst)
  }
}

#[async_trait::async_trait]
impl Plugin for CountingPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("counting")
  }

  fn hook_usage(&self) -> HookUsage {
    HookUsage::LOAD | HookUsage::TRANSFORM
  }

  async fn load(&self, _ctx: &PluginContext, _args: &HookLoadArgs<'_>) -> HookLoadReturn {
    self.loads.fetch_add(1, Ordering::SeqCst);
    if !self.load_delay.is_zero() {
      tokio::time::sleep(self.load_delay).await;
    }
    Ok(None)
  }

  async fn transform(&self, _ctx: &PluginContext, _args: &HookTransformArgs<'_>) -> HookTransformReturn {
    self.transforms.fetch_add(1, Ordering::SeqCst);
    Ok(None)
  }
}
