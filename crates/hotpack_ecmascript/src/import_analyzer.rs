use hotpack_error::{BuildError, BuildResult};
use hotpack_sourcemap::SourceMap;
use oxc::{allocator::Allocator, ast_visit::Visit, parser::Parser};
use string_wizard::{Hires, MagicString, SourceMapOptions};

use crate::{
  ecma_compiler::diagnostic_to_build_error,
  import_scanner::{ImportRecord, ImportScanner},
  EcmaCompiler,
};

#[derive(Debug, Default)]
pub struct ImportAnalysis {
  pub imports: Vec<ImportRecord>,
  /// The module touches `import.meta.hot`.
  pub has_hot: bool,
  pub is_self_accepting: bool,
  /// Specifiers passed to `import.meta.hot.accept(deps, cb)`, unresolved.
  pub accepted_deps: Vec<ImportRecord>,
}

pub struct ImportAnalyzer;

impl ImportAnalyzer {
  /// Parses `source` as an ES module and collects what the dev server needs
  /// to know about it. `id` is only used to pick the syntax and for diagnostics.
  pub fn analyze(source: &str, id: &str) -> BuildResult<ImportAnalysis> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, EcmaCompiler::source_type(id)).parse();
    if let Some(err) = ret.errors.first() {
      return Err(diagnostic_to_build_error(id, source, err));
    }

    let mut scanner = ImportScanner::default();
    scanner.visit_program(&ret.program);

    Ok(ImportAnalysis {
      imports: scanner.imports,
      has_hot: scanner.has_hot,
      is_self_accepting: scanner.is_self_accepting,
      accepted_deps: scanner.accepted_deps,
    })
  }
}

#[derive(Debug)]
pub struct RewriteReturn {
  pub code: String,
  /// Maps `code` back to the rewritten source. `None` when nothing changed.
  pub map: Option<SourceMap>,
}

/// Replaces each `(start, end)` byte range of `source` with the paired text
/// and puts `header` in front of the module. Ranges must be non-empty and must
/// not overlap.
pub fn rewrite_imports(
  source: &str,
  id: &str,
  header: Option<&str>,
  rewrites: &[(usize, usize, String)],
) -> BuildResult<RewriteReturn> {
  if rewrites.is_empty() && header.is_none() {
    return Ok(RewriteReturn { code: source.to_string(), map: None });
  }

  let mut sorted = rewrites.iter().collect::<Vec<_>>();
  sorted.sort_unstable_by_key(|(start, _, _)| *start);

  let mut magic_string = MagicString::new(source);
  let mut last_end = 0;
  for (start, end, replacement) in sorted {
    let (start, end) = (*start, *end);
    if start < last_end || start >= end || source.get(start..end).is_none() {
      return Err(BuildError::internal(
        id,
        format!("Can not rewrite the import at {start}..{end} of {id}"),
      ));
    }
    magic_string.update(start, end, replacement.clone());
    last_end = end;
  }
  if let Some(header) = header {
    magic_string.prepend(header.to_string());
  }

  let map = magic_string.source_map(SourceMapOptions {
    include_content: false,
    source: id.into(),
    hires: Hires::Boundary,
  });
  Ok(RewriteReturn { code: magic_string.to_string(), map: Some(map) })
}
