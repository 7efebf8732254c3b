use std::sync::Arc;

use hotpack_common::NormalizedDevOptions;
use hotpack_resolver::Resolver;

pub type SharedOptions = Arc<NormalizedDevOptions>;
pub type SharedResolver = Arc<Resolver>;
