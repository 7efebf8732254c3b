// A wrapper around the `oxc_resolver` crate for package (bare) specifiers served to the browser.

mod resolver;

pub use crate::resolver::{ResolveReturn, Resolver};

pub use oxc_resolver::ResolveError;
