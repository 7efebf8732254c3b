mod common;

use std::{borrow::Cow, path::Path, sync::Arc, time::Duration};

use common::{abs, drain, fixture, fixture_with, CountingPlugin};
use hotpack::{
  BuildErrorKind, DevOptions, FsEventKind, HookLoadArgs, HookLoadOutput, HookLoadReturn,
  HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, ModuleState, Plugin, PluginContext,
  SharedPlugin,
};
use rustc_hash::FxHashSet;

const MAIN: &str = "import { greet } from './util';\ngreet('hotpack');\n";
const UTIL: &str = "export function greet(name: string) {\n  return `hello ${name}`;\n}\n";

#[tokio::test]
async fn first_request_builds_the_graph() {
  let fixture = fixture(&[("/main.ts", MAIN), ("/util.ts", UTIL)]);
  let result = fixture.request("/main.ts").await.unwrap();

  assert!(result.code.contains("\"/util.ts\""));
  assert!(!result.code.contains("./util"));
  assert_eq!(result.deps.iter().map(|dep| dep.as_str()).collect::<Vec<_>>(), vec!["/util.ts"]);

  let main = fixture.module("/main.ts");
  let util = fixture.module("/util.ts");
  assert_eq!(fixture.server.graph().module_count(), 2);
  assert!(main.imported_modules.contains("/util.ts"));
  assert!(util.importers.contains("/main.ts"));
  assert_eq!(main.state, ModuleState::Fresh);
  assert_eq!(util.state, ModuleState::Stale);
  assert_eq!(util.file.as_deref(), Some(abs("/util.ts").as_path()));
  assert!(fixture.server.graph().is_entry("/main.ts"));
  assert!(!fixture.server.graph().is_entry("/util.ts"));

  let util_result = fixture.request("/util.ts").await.unwrap();
  assert!(util_result.code.contains("function greet(name)"));
  assert!(util_result.map.is_some());
}

#[tokio::test]
async fn cached_result_is_reused_without_running_plugins() {
  let counter = Arc::new(CountingPlugin::default());
  let fixture = fixture_with(
    &[("/main.ts", MAIN), ("/util.ts", UTIL)],
    vec![Arc::clone(&counter) as SharedPlugin],
    DevOptions::default(),
  );

  let first = fixture.request("/main.ts").await.unwrap();
  let second = fixture.request("/main.ts?t=42").await.unwrap();
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(counter.loads(), 1);
  assert_eq!(counter.transforms(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_share_one_compile() {
  let counter = CountingPlugin::with_delay(Duration::from_millis(100));
  let fixture = fixture_with(
    &[("/main.ts", MAIN), ("/util.ts", UTIL)],
    vec![Arc::clone(&counter) as SharedPlugin],
    DevOptions::default(),
  );

  let (first, second) = tokio::join!(fixture.request("/main.ts"), fixture.request("/main.ts"));
  assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
  assert_eq!(counter.loads(), 1);
  assert_eq!(counter.transforms(), 1);
  assert_eq!(fixture.server.transform_handler().in_flight_count(), 0);
}

#[tokio::test]
async fn different_modules_compile_independently() {
  let counter = CountingPlugin::with_delay(Duration::from_millis(50));
  let fixture = fixture_with(
    &[("/main.ts", MAIN), ("/util.ts", UTIL)],
    vec![Arc::clone(&counter) as SharedPlugin],
    DevOptions::default(),
  );

  let (main, util) = tokio::join!(fixture.request("/main.ts"), fixture.request("/util.ts"));
  assert!(!Arc::ptr_eq(&main.unwrap(), &util.unwrap()));
  assert_eq!(counter.loads(), 2);
}

#[tokio::test]
async fn invalidated_compile_is_discarded() {
  let counter = CountingPlugin::with_delay(Duration::from_millis(100));
  let fixture = Arc::new(fixture_with(
    &[("/main.ts", MAIN), ("/util.ts", UTIL)],
    vec![Arc::clone(&counter) as SharedPlugin],
    DevOptions::default(),
  ));

  let stale = tokio::spawn({
    let fixture = Arc::clone(&fixture);
    async move { fixture.request("/main.ts").await }
  });
  tokio::time::sleep(Duration::from_millis(20)).await;
  let main = fixture.server.graph().resolve_url("/main.ts");
  fixture.server.graph().invalidate_module(&main, &mut FxHashSet::default(), 1, true);

  // Started after the invalidation, so it must not join the stale compile.
  let fresh = fixture.request("/main.ts").await.unwrap();
  let stale = stale.await.unwrap().unwrap();

  assert_eq!(counter.loads(), 2);
  assert!(!Arc::ptr_eq(&stale, &fresh));
  assert!(Arc::ptr_eq(&fixture.server.graph().cached_result("/main.ts").unwrap(), &fresh));
  assert_eq!(fixture.module("/main.ts").version, 1);
}

#[tokio::test]
async fn errors_do_not_stick() {
  let fixture = fixture(&[("/main.ts", "import { value } from './missing';\nconsole.log(value);\n")]);
  let mut client = fixture.client().await;

  let err = fixture.request("/main.ts").await.unwrap_err();
  assert_eq!(err.kind, BuildErrorKind::UnresolvedImport);
  assert_eq!(err.specifier.as_deref(), Some("./missing"));
  assert_eq!(err.importer.as_deref(), Some("/main.ts"));
  assert_eq!(fixture.module("/main.ts").state, ModuleState::Errored);

  let messages = drain(&mut client);
  assert_eq!(messages.len(), 1);
  assert_eq!(messages[0]["type"], "error");
  assert!(messages[0]["err"]["message"].as_str().unwrap().contains("./missing"));

  fixture.write("/missing.ts", "export const value = 1;\n");
  let result = fixture.request("/main.ts").await.unwrap();
  assert!(result.code.contains("\"/missing.ts\""));
  assert_eq!(fixture.module("/main.ts").state, ModuleState::Fresh);
}

#[tokio::test]
async fn syntax_errors_carry_a_frame_and_recover() {
  let fixture = fixture(&[("/main.js", "const a = ;\n")]);
  let err = fixture.request("/main.js").await.unwrap_err();
  assert_eq!(err.kind, BuildErrorKind::Parse);
  assert!(err.frame.is_some());

  fixture.write("/main.js", "export const a = 1;\n");
  assert!(fixture.request("/main.js").await.is_ok());
}

#[tokio::test]
async fn missing_module_is_not_found() {
  let fixture = fixture(&[]);
  let mut client = fixture.client().await;
  let err = fixture.request("/nope.ts").await.unwrap_err();
  assert!(err.is_not_found());
  // Nothing to report to the page.
  assert!(drain(&mut client).is_empty());
}

#[tokio::test]
async fn non_js_imports_are_marked_and_query_variants_are_separate() {
  let fixture = fixture(&[
    ("/main.js", "import './style.css';\nimport css from './style.css?inline';\nimport data from './data.json';\nimport('./lazy.js');\nimport 'https://esm.sh/vue';\nconsole.log(css, data);\n"),
    ("/style.css", "body { color: red; }"),
    ("/data.json", "{ \"a\": 1 }"),
    ("/lazy.js", "export default 1;\n"),
  ]);
  let result = fixture.request("/main.js").await.unwrap();
  assert!(result.code.contains("'/style.css?import'"));
  assert!(result.code.contains("'/style.css?inline&import'"));
  assert!(result.code.contains("'/data.json?import'"));
  assert!(result.code.contains("import('/lazy.js')"));
  assert!(result.code.contains("'https://esm.sh/vue'"));
  assert_eq!(result.deps.len(), 4);

  let plain = fixture.request("/style.css?import&t=1").await.unwrap();
  let inline = fixture.request("/style.css?inline&import").await.unwrap();
  assert!(plain.code.contains("updateStyle"));
  assert!(inline.code.contains("export default \"body { color: red; }\""));
  assert!(fixture.module("/style.css").is_self_accepting);
  assert!(!fixture.module("/style.css?inline").is_self_accepting);

  let by_file = fixture.server.graph().get_modules_by_file(&abs("/style.css"));
  assert_eq!(by_file.len(), 2);
  assert_eq!(fixture.request("/data.json?import").await.unwrap().code.as_str(), "export default { \"a\": 1 };\n");
}

#[tokio::test]
async fn hot_modules_get_a_context_and_accepted_deps_are_rewritten() {
  let fixture = fixture(&[
    ("/main.js", "import { render } from './render.js';\nrender();\nimport.meta.hot.accept('./render.js', (mod) => mod.render());\n"),
    ("/render.js", "export function render() {}\n"),
  ]);
  let result = fixture.request("/main.js").await.unwrap();
  assert!(result.code.starts_with(
    "import { createHotContext as __hotpack__createHotContext } from \"/@hotpack/client\";import.meta.hot = __hotpack__createHotContext(\"/main.js\");\n"
  ));
  assert!(result.code.contains("import.meta.hot.accept('/render.js'"));

  let main = fixture.module("/main.js");
  assert!(!main.is_self_accepting);
  assert!(main.accepted_hmr_deps.contains("/render.js"));
}

#[tokio::test]
async fn source_map_accounts_for_rewrites_and_the_hot_header() {
  let fixture = fixture(&[
    ("/main.ts", "import { greet } from './util';\ngreet('hotpack');\nimport.meta.hot.accept();\n"),
    ("/util.ts", UTIL),
  ]);
  let result = fixture.request("/main.ts").await.unwrap();
  let lines = result.code.lines().collect::<Vec<_>>();
  assert!(lines[0].starts_with("import { createHotContext"));
  assert!(lines[1].contains("\"/util.ts\""));
  assert!(lines[2].starts_with("greet("));

  let map = result.map.as_ref().unwrap();
  let table = map.generate_lookup_table();
  let token = map.lookup_source_view_token(&table, 2, 0).unwrap();
  assert_eq!((token.get_src_line(), token.get_src_col()), (1, 0));
  let token = map.lookup_source_view_token(&table, 1, 0).unwrap();
  assert_eq!((token.get_src_line(), token.get_src_col()), (0, 0));
}

#[tokio::test]
async fn imports_of_updated_modules_carry_their_timestamp() {
  let fixture = fixture(&[
    ("/main.js", "import './counter.js';\n"),
    ("/counter.js", "export let count = 0;\nimport.meta.hot.accept();\n"),
  ]);
  fixture.request("/main.js").await.unwrap();
  fixture.request("/counter.js").await.unwrap();

  let Some(hotpack::HmrPayload::Update { updates }) =
    fixture.edit("/counter.js", "export let count = 1;\nimport.meta.hot.accept();\n").await
  else {
    panic!("expected an update");
  };
  let timestamp = updates[0].timestamp;

  // The importer stayed fresh; once it is compiled again it points at the new version.
  fixture.server.graph().invalidate_all(timestamp + 1);
  let main = fixture.request("/main.js").await.unwrap();
  assert!(main.code.contains(&format!("'/counter.js?t={timestamp}'")));
}

#[tokio::test]
async fn dropped_imports_are_pruned() {
  let fixture = fixture(&[("/main.js", "import './a.js';\n"), ("/a.js", "import './b.js';\n"), ("/b.js", "")]);
  fixture.request("/main.js").await.unwrap();
  fixture.request("/a.js").await.unwrap();
  let mut client = fixture.client().await;

  let payload = fixture.edit("/main.js", "console.log('no imports');\n").await;
  assert_eq!(payload, Some(hotpack::HmrPayload::full_reload()));
  fixture.request("/main.js").await.unwrap();

  let messages = drain(&mut client);
  assert_eq!(messages.len(), 2);
  assert_eq!(messages[0]["type"], "full-reload");
  assert_eq!(messages[1]["type"], "prune");
  let mut paths = messages[1]["paths"].as_array().unwrap().iter().map(|path| path.as_str().unwrap()).collect::<Vec<_>>();
  paths.sort_unstable();
  assert_eq!(paths, vec!["/a.js", "/b.js"]);
  assert!(fixture.server.graph().get_module_by_url("/a.js").is_none());
}

struct VirtualPlugin;

#[async_trait::async_trait]
impl Plugin for VirtualPlugin {
  fn name(&self) -> Cow<'static, str> {
    Cow::Borrowed("virtual")
  }

  async fn resolve_id(&self, _ctx: &PluginContext, args: &HookResolveIdArgs<'_>) -> HookResolveIdReturn {
    Ok((args.specifier == "virtual:env").then(|| HookResolveIdOutput { id: "\0virtual:env".into(), external: false }))
  }

  async fn load(&self, _ctx: &PluginContext, args: &HookLoadArgs<'_>) -> HookLoadReturn {
    Ok((args.id == "\0virtual:env").then(|| HookLoadOutput { code: "export const mode = 'dev';\n".to_string(), map: None }))
  }
}

#[tokio::test]
async fn virtual_modules_are_served_through_id_urls() {
  let fixture = fixture_with(
    &[("/main.js", "import { mode } from 'virtual:env';\nconsole.log(mode);\n")],
    vec![Arc::new(VirtualPlugin) as SharedPlugin],
    DevOptions::default(),
  );
  let main = fixture.request("/main.js").await.unwrap();
  assert!(main.code.contains("'/@id/__x00__virtual:env?import'"));

  let env = fixture.request("/@id/__x00__virtual:env?import").await.unwrap();
  assert_eq!(env.code.as_str(), "export const mode = 'dev';\n");
  let info = fixture.module("/@id/__x00__virtual:env");
  assert_eq!(info.id.as_deref(), Some("\0virtual:env"));
  assert!(info.file.is_none());
  assert!(fixture.server.graph().get_modules_by_file(Path::new("\0virtual:env")).is_empty());

  assert_eq!(fixture.event("/main.js", FsEventKind::Unlink).await, Some(hotpack::HmrPayload::full_reload()));
}
