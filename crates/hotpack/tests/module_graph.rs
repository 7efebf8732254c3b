use std::{path::Path, sync::Arc};

use hotpack::{
  update_payload, HmrBoundary, HmrPayload, ModuleGraph, ModuleState, ModuleUrl, ResolvedId,
  TransformResult,
};
use hotpack_utils::indexmap::FxIndexSet;
use rustc_hash::FxHashSet;

fn url(value: &str) -> ModuleUrl {
  ModuleUrl::from(value)
}

fn set(urls: &[&str]) -> FxIndexSet<ModuleUrl> {
  urls.iter().map(|value| url(value)).collect()
}

fn link(graph: &ModuleGraph, importer: &str, imported: &[&str]) {
  graph.ensure_entry_from_url(&url(importer));
  graph.update_module_info(&url(importer), &set(imported), &FxIndexSet::default(), false);
}

fn make_fresh(graph: &ModuleGraph, value: &str) -> Arc<TransformResult> {
  let info = graph.ensure_entry_from_url(&url(value));
  let result = Arc::new(TransformResult::new(format!("// {value}"), None, Vec::new()));
  graph.begin_compile(&url(value), info.version);
  assert!(graph.commit_transform_result(&url(value), info.version, Arc::clone(&result)));
  result
}

fn state(graph: &ModuleGraph, value: &str) -> ModuleState {
  graph.get_module_by_url(value).unwrap().state
}

fn invalidate(graph: &ModuleGraph, value: &str) -> hotpack::InvalidationResult {
  graph.invalidate_module(&url(value), &mut FxHashSet::default(), 1, true)
}

#[test]
fn edges_stay_symmetric() {
  let graph = ModuleGraph::default();
  link(&graph, "/a.ts", &["/b.ts", "/c.ts"]);
  assert_eq!(graph.get_module_by_url("/b.ts").unwrap().importers, set(&["/a.ts"]));

  let no_longer_imported =
    graph.update_module_info(&url("/a.ts"), &set(&["/c.ts", "/d.ts"]), &FxIndexSet::default(), false);
  assert_eq!(no_longer_imported, set(&["/b.ts"]));

  let a = graph.get_module_by_url("/a.ts").unwrap();
  assert_eq!(a.imported_modules, set(&["/c.ts", "/d.ts"]));
  assert!(graph.get_module_by_url("/b.ts").unwrap().importers.is_empty());
  assert_eq!(graph.get_module_by_url("/d.ts").unwrap().importers, set(&["/a.ts"]));
}

#[test]
fn accepted_deps_are_a_subset_of_imports() {
  let graph = ModuleGraph::default();
  graph.update_module_info(&url("/a.ts"), &set(&["/b.ts"]), &set(&["/b.ts", "/x.ts"]), false);
  assert_eq!(graph.get_module_by_url("/a.ts").unwrap().accepted_hmr_deps, set(&["/b.ts"]));
}

#[test]
fn invalidation_walks_up_importers() {
  let graph = ModuleGraph::default();
  link(&graph, "/a.ts", &["/b.ts"]);
  link(&graph, "/b.ts", &["/c.ts"]);
  for module in ["/a.ts", "/b.ts", "/c.ts"] {
    make_fresh(&graph, module);
  }

  let result = invalidate(&graph, "/c.ts");
  assert_eq!(state(&graph, "/a.ts"), ModuleState::Stale);
  assert_eq!(state(&graph, "/b.ts"), ModuleState::Stale);
  assert!(result.has_dead_end);
  assert!(result.needs_full_reload());
  assert!(graph.cached_result("/a.ts").is_none());
}

#[test]
fn self_accepting_module_is_a_boundary() {
  let graph = ModuleGraph::default();
  link(&graph, "/a.ts", &["/b.ts"]);
  graph.update_module_info(&url("/b.ts"), &set(&["/c.ts"]), &FxIndexSet::default(), true);
  for module in ["/a.ts", "/b.ts", "/c.ts"] {
    make_fresh(&graph, module);
  }

  let result = invalidate(&graph, "/c.ts");
  assert_eq!(state(&graph, "/c.ts"), ModuleState::Stale);
  assert_eq!(state(&graph, "/b.ts"), ModuleState::Stale);
  assert_eq!(state(&graph, "/a.ts"), ModuleState::Fresh);
  assert!(!result.needs_full_reload());
  assert_eq!(
    result.boundaries.into_iter().collect::<Vec<_>>(),
    vec![HmrBoundary { boundary: url("/b.ts"), accepted_via: url("/b.ts") }]
  );
}

#[test]
fn importer_accepting_a_dep_is_a_boundary() {
  let graph = ModuleGraph::default();
  graph.update_module_info(&url("/a.ts"), &set(&["/b.ts"]), &set(&["/b.ts"]), false);
  make_fresh(&graph, "/a.ts");
  make_fresh(&graph, "/b.ts");

  let result = invalidate(&graph, "/b.ts");
  assert_eq!(state(&graph, "/a.ts"), ModuleState::Fresh);
  assert_eq!(state(&graph, "/b.ts"), ModuleState::Stale);
  assert_eq!(
    result.boundaries.into_iter().collect::<Vec<_>>(),
    vec![HmrBoundary { boundary: url("/a.ts"), accepted_via: url("/b.ts") }]
  );
}

#[test]
fn cycles_terminate_and_visit_once() {
  let graph = ModuleGraph::default();
  link(&graph, "/a.ts", &["/b.ts"]);
  link(&graph, "/b.ts", &["/a.ts"]);

  let result = invalidate(&graph, "/a.ts");
  assert_eq!(result.invalidated, vec![url("/a.ts"), url("/b.ts")]);
  assert_eq!(graph.get_module_by_url("/a.ts").unwrap().version, 1);
  assert_eq!(graph.get_module_by_url("/b.ts").unwrap().version, 1);
  // Nothing accepts the cycle.
  assert!(result.needs_full_reload());
}

#[test]
fn seen_set_is_shared_within_one_cycle() {
  let graph = ModuleGraph::default();
  link(&graph, "/main.ts", &["/a.ts", "/b.ts"]);
  link(&graph, "/a.ts", &["/shared.ts"]);
  link(&graph, "/b.ts", &["/shared.ts"]);

  let mut seen = FxHashSet::default();
  let mut result = graph.invalidate_module(&url("/a.ts"), &mut seen, 5, true);
  result.merge(graph.invalidate_module(&url("/b.ts"), &mut seen, 5, true));
  let main_visits = result.invalidated.iter().filter(|visited| visited.as_str() == "/main.ts").count();
  assert_eq!(main_visits, 1);
  assert_eq!(graph.get_module_by_url("/main.ts").unwrap().last_hmr_timestamp, 5);
}

#[test]
fn unaccepted_entry_needs_full_reload() {
  let graph = ModuleGraph::default();
  graph.ensure_entry_from_url(&url("/main.ts"));
  make_fresh(&graph, "/main.ts");

  let result = invalidate(&graph, "/main.ts");
  assert_eq!(update_payload(&result, 1), Some(HmrPayload::full_reload()));
}

#[test]
fn non_hmr_invalidation_reports_no_boundaries() {
  let graph = ModuleGraph::default();
  graph.update_module_info(&url("/b.ts"), &set(&["/c.ts"]), &FxIndexSet::default(), true);
  let result = graph.invalidate_module(&url("/c.ts"), &mut FxHashSet::default(), 3, false);
  assert!(result.boundaries.is_empty());
  assert!(!result.has_dead_end);
  assert_eq!(graph.get_module_by_url("/c.ts").unwrap().last_hmr_timestamp, 0);
  assert_eq!(graph.get_module_by_url("/c.ts").unwrap().last_invalidation_timestamp, 3);
}

#[test]
fn stale_results_are_not_committed() {
  let graph = ModuleGraph::default();
  let info = graph.ensure_entry_from_url(&url("/a.ts"));
  graph.begin_compile(&url("/a.ts"), info.version);
  assert_eq!(state(&graph, "/a.ts"), ModuleState::Compiling);

  invalidate(&graph, "/a.ts");
  let result = Arc::new(TransformResult::new("export {}", None, Vec::new()));
  assert!(!graph.commit_transform_result(&url("/a.ts"), info.version, result));
  assert_eq!(state(&graph, "/a.ts"), ModuleState::Stale);
  assert!(graph.cached_result("/a.ts").is_none());
}

#[test]
fn errors_are_not_cached() {
  let graph = ModuleGraph::default();
  let result = make_fresh(&graph, "/a.ts");
  assert!(Arc::ptr_eq(&graph.cached_result("/a.ts").unwrap(), &result));

  let version = graph.get_module_by_url("/a.ts").unwrap().version;
  graph.mark_errored(&url("/a.ts"), version);
  assert_eq!(state(&graph, "/a.ts"), ModuleState::Errored);
  assert!(graph.cached_result("/a.ts").is_none());
  assert_eq!(graph.errored_modules(), vec![url("/a.ts")]);
}

#[test]
fn query_variants_are_distinct_modules_of_one_file() {
  let graph = ModuleGraph::default();
  let plain = graph.resolve_url("/src/a.css?t=123&import");
  let inline = graph.resolve_url("/src/a.css?inline&t=5#hash");
  assert_eq!(plain.as_str(), "/src/a.css");
  assert_eq!(inline.as_str(), "/src/a.css?inline");

  graph.update_resolved(&plain, &ResolvedId::new("/project/src/a.css"));
  graph.update_resolved(&inline, &ResolvedId::new("/project/src/a.css?inline"));
  assert_eq!(graph.module_count(), 2);
  assert_eq!(graph.get_modules_by_file(Path::new("/project/src/a.css")), set(&["/src/a.css", "/src/a.css?inline"]));
  assert_eq!(graph.get_module_by_id("/project/src/a.css?inline").unwrap().url, inline);
}

#[test]
fn invalidate_all_drops_every_result() {
  let graph = ModuleGraph::default();
  make_fresh(&graph, "/a.ts");
  make_fresh(&graph, "/b.ts");
  graph.invalidate_all(9);
  assert_eq!(state(&graph, "/a.ts"), ModuleState::Stale);
  assert_eq!(state(&graph, "/b.ts"), ModuleState::Stale);
}

#[test]
fn prune_removes_unreachable_modules() {
  let graph = ModuleGraph::default();
  graph.mark_entry(&url("/main.ts"));
  link(&graph, "/main.ts", &["/a.ts"]);
  link(&graph, "/a.ts", &["/b.ts"]);
  link(&graph, "/b.ts", &["/a.ts"]);
  graph.update_resolved(&url("/b.ts"), &ResolvedId::new("/project/b.ts"));

  graph.update_module_info(&url("/main.ts"), &FxIndexSet::default(), &FxIndexSet::default(), false);
  let mut pruned = graph.prune_unreachable();
  pruned.sort();
  assert_eq!(pruned, vec![url("/a.ts"), url("/b.ts")]);
  assert_eq!(graph.module_count(), 1);
  assert!(graph.get_modules_by_file(Path::new("/project/b.ts")).is_empty());
  assert!(graph.get_module_by_id("/project/b.ts").is_none());
}
