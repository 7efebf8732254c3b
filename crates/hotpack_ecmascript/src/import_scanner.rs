use oxc::{
  ast::ast::{
    self, Argument, ArrayExpressionElement, Expression, ImportOrExportKind, StringLiteral,
  },
  ast_visit::{walk, Visit},
  span::Span,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
  /// `import x from './x'`, `export * from './x'`
  Static,
  /// `import('./x')`
  Dynamic,
}

#[derive(Debug, Clone)]
pub struct ImportRecord {
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub specifier: String,
  pub kind: ImportKind,
  /// Span of the string literal, quotes included.
  pub span: Span,
}

impl ImportRecord {
  /// The span of the specifier text itself, quotes excluded.
  pub fn inner_span(&self) -> (usize, usize) {
    (self.span.start as usize + 1, self.span.end as usize - 1)
  }
}

/// Collects import specifiers and `import.meta.hot` usage in a single pass.
#[derive(Default)]
pub struct ImportScanner {
  pub imports: Vec<ImportRecord>,
  pub has_hot: bool,
  pub is_self_accepting: bool,
  pub accepted_deps: Vec<ImportRecord>,
}

impl ImportScanner {
  fn add_import(&mut self, source: &StringLiteral, kind: ImportKind) {
    self.imports.push(ImportRecord {
      specifier: source.value.to_string(),
      kind,
      span: source.span,
    });
  }

  fn add_accepted_dep(&mut self, source: &StringLiteral) {
    self.accepted_deps.push(ImportRecord {
      specifier: source.value.to_string(),
      kind: ImportKind::Static,
      span: source.span,
    });
  }

  /// `import.meta.hot.accept(...)`
  fn scan_hot_accept(&mut self, call: &ast::CallExpression) {
    let Expression::StaticMemberExpression(callee) = &call.callee else {
      return;
    };
    if !is_import_meta_hot(&callee.object) {
      return;
    }

    match callee.property.name.as_str() {
      "accept" => match call.arguments.first() {
        None | Some(Argument::FunctionExpression(_) | Argument::ArrowFunctionExpression(_)) => {
          self.is_self_accepting = true;
        }
        Some(Argument::StringLiteral(dep)) => self.add_accepted_dep(dep),
        Some(Argument::ArrayExpression(deps)) => {
          for element in &deps.elements {
            if let ArrayExpressionElement::StringLiteral(dep) = element {
              self.add_accepted_dep(dep);
            }
          }
        }
        Some(_) => {}
      },
      "acceptExports" => self.is_self_accepting = true,
      _ => {}
    }
  }
}

fn is_import_meta_hot(expr: &Expression) -> bool {
  matches!(expr, Expression::StaticMemberExpression(member) if is_meta_hot_member(member))
}

fn is_meta_hot_member(member: &ast::StaticMemberExpression) -> bool {
  member.property.name.as_str() == "hot"
    && matches!(
      &member.object,
      Expression::MetaProperty(meta) if meta.meta.name.as_str() == "import" && meta.property.name.as_str() == "meta"
    )
}

impl<'a> Visit<'a> for ImportScanner {
  fn visit_import_declaration(&mut self, it: &ast::ImportDeclaration<'a>) {
    if !matches!(it.import_kind, ImportOrExportKind::Type) {
      self.add_import(&it.source, ImportKind::Static);
    }
  }

  fn visit_export_named_declaration(&mut self, it: &ast::ExportNamedDeclaration<'a>) {
    if let Some(source) = &it.source {
      if !matches!(it.export_kind, ImportOrExportKind::Type) {
        self.add_import(source, ImportKind::Static);
      }
    }
    walk::walk_export_named_declaration(self, it);
  }

  fn visit_export_all_declaration(&mut self, it: &ast::ExportAllDeclaration<'a>) {
    if !matches!(it.export_kind, ImportOrExportKind::Type) {
      self.add_import(&it.source, ImportKind::Static);
    }
  }

  fn visit_import_expression(&mut self, it: &ast::ImportExpression<'a>) {
    if let Expression::StringLiteral(source) = &it.source {
      self.add_import(source, ImportKind::Dynamic);
    }
    walk::walk_import_expression(self, it);
  }

  fn visit_call_expression(&mut self, it: &ast::CallExpression<'a>) {
    self.scan_hot_accept(it);
    walk::walk_call_expression(self, it);
  }

  fn visit_static_member_expression(&mut self, it: &ast::StaticMemberExpression<'a>) {
    if is_meta_hot_member(it) {
      self.has_hot = true;
    }
    walk::walk_static_member_expression(self, it);
  }
}
