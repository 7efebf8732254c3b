use memchr::memchr_iter;

const CONTEXT_LINES: usize = 2;

/// Renders the lines around byte `offset` of `source` with a caret under the
/// offending column, e.g.
///
/// ```text
/// 1 | import a from './a'
/// 2 | const = 1
///   |       ^
/// 3 | export {}
/// ```
pub fn code_frame(source: &str, offset: usize) -> String {
  let offset = offset.min(source.len());
  let line_starts = std::iter::once(0)
    .chain(memchr_iter(b'\n', source.as_bytes()).map(|idx| idx + 1))
    .collect::<Vec<_>>();

  let line = line_starts.partition_point(|start| *start <= offset).saturating_sub(1);
  let column = offset - line_starts[line];

  let first = line.saturating_sub(CONTEXT_LINES);
  let last = (line + CONTEXT_LINES).min(line_starts.len() - 1);
  let gutter = (last + 1).to_string().len();

  let mut frame = String::new();
  for current in first..=last {
    let start = line_starts[current];
    let end = line_starts.get(current + 1).map_or(source.len(), |next| next - 1);
    let text = source[start..end].trim_end_matches('\r');
    frame.push_str(&format!("{:>gutter$} | {text}\n", current + 1));
    if current == line {
      frame.push_str(&format!("{:>gutter$} | {}^\n", "", " ".repeat(column)));
    }
  }
  frame
}

#[test]
fn test_code_frame() {
  let source = "import a from './a'\nconst = 1\nexport {}\n";
  let offset = source.find("= 1").unwrap();
  let frame = code_frame(source, offset);
  assert_eq!(frame, "1 | import a from './a'\n2 | const = 1\n  |       ^\n3 | export {}\n4 | \n");
}
