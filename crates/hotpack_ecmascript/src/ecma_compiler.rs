use std::path::Path;

use hotpack_error::{BuildError, BuildResult};
use hotpack_sourcemap::SourceMap;
use hotpack_utils::{
  code_frame::code_frame,
  url::{clean_url, extension},
};
use oxc::{
  allocator::Allocator,
  codegen::{Codegen, CodegenOptions},
  diagnostics::OxcDiagnostic,
  parser::Parser,
  semantic::SemanticBuilder,
  span::SourceType,
  transformer::{ESTarget, TransformOptions, Transformer},
};

#[derive(Debug)]
pub struct TranspileReturn {
  pub code: String,
  pub map: Option<SourceMap>,
}

pub struct EcmaCompiler;

impl EcmaCompiler {
  /// TypeScript and JSX have to be lowered before a browser can run them.
  pub fn needs_transpile(id: &str) -> bool {
    matches!(extension(id), Some("ts" | "mts" | "cts" | "tsx" | "jsx"))
  }

  pub fn source_type(id: &str) -> SourceType {
    SourceType::from_path(clean_url(id)).unwrap_or_else(|_| SourceType::mjs())
  }

  /// Strips types and compiles JSX, leaving every other syntax untouched.
  pub fn transpile(source: &str, id: &str) -> BuildResult<TranspileReturn> {
    let allocator = Allocator::default();
    let path = Path::new(clean_url(id));

    let ret = Parser::new(&allocator, source, Self::source_type(id)).parse();
    if let Some(err) = ret.errors.first() {
      return Err(diagnostic_to_build_error(id, source, err));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();
    let transformer_return =
      Transformer::new(&allocator, path, &TransformOptions::from(ESTarget::ESNext))
        .build_with_scoping(scoping, &mut program);
    if let Some(err) = transformer_return.errors.first() {
      return Err(diagnostic_to_build_error(id, source, err));
    }

    let printed = Codegen::new()
      .with_options(CodegenOptions {
        source_map_path: Some(path.to_path_buf()),
        ..CodegenOptions::default()
      })
      .build(&program);

    // oxc may be built against another `oxc_sourcemap` release, JSON is the common ground.
    let map = printed.map.and_then(|map| SourceMap::from_json_string(&map.to_json_string()).ok());
    Ok(TranspileReturn { code: printed.code, map })
  }
}

pub(crate) fn diagnostic_to_build_error(id: &str, source: &str, err: &OxcDiagnostic) -> BuildError {
  let offset = err.labels.as_ref().and_then(|labels| labels.first()).map(|label| label.offset());
  let build_error = BuildError::parse(id, err.to_string());
  match offset {
    Some(offset) => build_error.with_frame(code_frame(source, offset)),
    None => build_error,
  }
}

#[test]
fn strips_typescript() {
  let ret = EcmaCompiler::transpile(
    "import type { A } from './a';\nconst value: number = 1;\nexport default value as A;\n",
    "/src/main.ts?t=3",
  )
  .unwrap();
  assert!(!ret.code.contains("number"));
  assert!(!ret.code.contains("./a"));
  assert!(ret.code.contains("const value = 1;"));
  assert!(ret.map.is_some());
}

#[test]
fn reports_parse_errors_with_frame() {
  let err = EcmaCompiler::transpile("const a: = 1;", "/src/broken.ts").unwrap_err();
  assert_eq!(err.kind, hotpack_error::BuildErrorKind::Parse);
  assert!(err.frame.unwrap().contains("const a: = 1;"));
}

#[test]
fn test_needs_transpile() {
  assert!(EcmaCompiler::needs_transpile("/src/App.tsx?t=1"));
  assert!(EcmaCompiler::needs_transpile("/src/main.ts"));
  assert!(!EcmaCompiler::needs_transpile("/src/main.js"));
  assert!(!EcmaCompiler::needs_transpile("/src/style.css"));
}
