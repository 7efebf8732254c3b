mod ecma_compiler;
mod import_analyzer;
mod import_scanner;

pub use crate::{
  ecma_compiler::{EcmaCompiler, TranspileReturn},
  import_analyzer::{rewrite_imports, ImportAnalysis, ImportAnalyzer, RewriteReturn},
  import_scanner::{ImportKind, ImportRecord},
};
