bitflags::bitflags! {
  /// The hooks a plugin actually implements. The driver skips a plugin for
  /// every hook missing from its usage.
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct HookUsage: u8 {
    const RESOLVE_ID = 1;
    const LOAD = 1 << 1;
    const TRANSFORM = 1 << 2;
    const HANDLE_HOT_UPDATE = 1 << 3;
  }
}
