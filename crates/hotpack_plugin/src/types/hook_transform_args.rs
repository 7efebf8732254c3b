#[derive(Debug)]
pub struct HookTransformArgs<'a> {
  pub id: &'a str,
  /// Output of the previous transform, or the loaded source for the first one.
  pub code: &'a str,
}
