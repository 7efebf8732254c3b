use oxc_sourcemap::{SourceMap, SourceMapBuilder};

/// Composes a chain of source maps produced by successive transforms.
///
/// `chain[0]` maps the original source to the output of the first transform,
/// `chain[n]` maps the output of transform `n` to the output of transform
/// `n + 1`. The result maps the final output straight back to the original
/// source. Segments that can not be traced through every map are dropped.
pub fn collapse_sourcemaps(chain: &[SourceMap]) -> Option<SourceMap> {
  let (last, rest) = chain.split_last()?;
  if rest.is_empty() {
    return Some(last.clone());
  }

  let lookup_tables = rest.iter().map(SourceMap::generate_lookup_table).collect::<Vec<_>>();
  let mut builder = SourceMapBuilder::default();

  for token in last.get_source_view_tokens() {
    let mut line = token.get_src_line();
    let mut col = token.get_src_col();
    let mut original = None;

    for (map, table) in rest.iter().zip(&lookup_tables).rev() {
      let Some(traced) = map.lookup_source_view_token(table, line, col) else {
        original = None;
        break;
      };
      line = traced.get_src_line();
      col = traced.get_src_col();
      original = Some(traced);
    }

    let Some(original) = original else {
      continue;
    };

    let source_id = match original.get_source_and_content() {
      Some((source, content)) => Some(builder.add_source_and_content(source, content)),
      None => original.get_source().map(|source| builder.add_source_and_content(source, "")),
    };
    let name_id = original.get_name().map(|name| builder.add_name(name));
    builder.add_token(token.get_dst_line(), token.get_dst_col(), line, col, source_id, name_id);
  }

  Some(builder.into_sourcemap())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn single_source_map(tokens: &[(u32, u32, u32, u32)]) -> SourceMap {
    let mut builder = SourceMapBuilder::default();
    let source_id = builder.add_source_and_content("/src/main.ts", "const a: number = 1");
    for &(dst_line, dst_col, src_line, src_col) in tokens {
      builder.add_token(dst_line, dst_col, src_line, src_col, Some(source_id), None);
    }
    builder.into_sourcemap()
  }

  #[test]
  fn single_map_is_returned_as_is() {
    let map = single_source_map(&[(0, 0, 0, 0)]);
    let collapsed = collapse_sourcemaps(&[map.clone()]).unwrap();
    assert_eq!(collapsed.to_json_string(), map.to_json_string());
  }

  #[test]
  fn empty_chain_has_no_map() {
    assert!(collapse_sourcemaps(&[]).is_none());
  }

  #[test]
  fn traces_through_two_maps() {
    // original (0, 6) -> first output (1, 4) -> second output (2, 8)
    let first = single_source_map(&[(1, 4, 0, 6)]);
    let mut builder = SourceMapBuilder::default();
    let source_id = builder.add_source_and_content("/src/main.ts", "");
    builder.add_token(2, 8, 1, 4, Some(source_id), None);
    let second = builder.into_sourcemap();

    let collapsed = collapse_sourcemaps(&[first, second]).unwrap();
    let tokens = collapsed.get_source_view_tokens().collect::<Vec<_>>();
    assert_eq!(tokens.len(), 1);
    assert_eq!((tokens[0].get_dst_line(), tokens[0].get_dst_col()), (2, 8));
    assert_eq!((tokens[0].get_src_line(), tokens[0].get_src_col()), (0, 6));
    assert_eq!(
      tokens[0].get_source_and_content().map(|(source, _)| source.to_string()),
      Some("/src/main.ts".to_string())
    );
  }
}
