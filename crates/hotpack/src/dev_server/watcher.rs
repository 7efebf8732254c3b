use std::path::{Component, Path};

use hotpack_common::{FsEvent, FsEventKind, NormalizedDevOptions};
use notify::{
  event::{ModifyKind, RenameMode},
  Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use tokio::sync::mpsc::UnboundedSender;

const IGNORED_DIRS: [&str; 2] = ["node_modules", ".git"];

/// Watches the project root, and the config file if it lives elsewhere. The
/// callback only forwards events, the receiving side does the work.
///
/// Dropping the returned watcher stops watching.
pub fn watch(
  options: &NormalizedDevOptions,
  tx: UnboundedSender<FsEvent>,
) -> notify::Result<RecommendedWatcher> {
  let mut watcher = RecommendedWatcher::new(
    move |res: notify::Result<Event>| match res {
      Ok(event) => {
        for fs_event in to_fs_events(&event) {
          let _ = tx.send(fs_event);
        }
      }
      // One unreadable path must not stop the watcher.
      Err(err) => tracing::warn!("file watcher error on {:?}: {err}", err.paths),
    },
    Config::default(),
  )?;

  watcher.watch(&options.root, RecursiveMode::Recursive)?;
  if let Some(config_file) = options.config_file.as_ref().filter(|file| !file.starts_with(&options.root)) {
    if let Err(err) = watcher.watch(config_file, RecursiveMode::NonRecursive) {
      tracing::warn!("failed to watch {}: {err}", config_file.display());
    }
  }
  Ok(watcher)
}

pub fn to_fs_events(event: &Event) -> Vec<FsEvent> {
  let with_kind =
    |kind: FsEventKind| event.paths.iter().map(move |path| FsEvent::new(path.clone(), kind));

  let events: Vec<FsEvent> = match event.kind {
    EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
      with_kind(FsEventKind::Add).collect()
    }
    EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
      with_kind(FsEventKind::Unlink).collect()
    }
    EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
      [from, to] => vec![
        FsEvent::new(from.clone(), FsEventKind::Unlink),
        FsEvent::new(to.clone(), FsEventKind::Add),
      ],
      _ => Vec::new(),
    },
    EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
    EventKind::Modify(_) => with_kind(FsEventKind::Change).collect(),
    EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
  };

  events.into_iter().filter(|event| !is_ignored(&event.path)).collect()
}

fn is_ignored(path: &Path) -> bool {
  path.components().any(|component| match component {
    Component::Normal(name) => IGNORED_DIRS.iter().any(|dir| name == *dir),
    _ => false,
  })
}
