/// Plugins run grouped by order, in declaration order inside each group.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PluginOrder {
  Pre,
  #[default]
  Normal,
  Post,
}
