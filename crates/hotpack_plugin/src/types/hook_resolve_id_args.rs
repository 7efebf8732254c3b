#[derive(Debug)]
pub struct HookResolveIdArgs<'a> {
  /// The resolved id of the importing module, `None` for urls requested by the browser.
  pub importer: Option<&'a str>,
  pub specifier: &'a str,
}
