mod local_override_resolver;

pub use local_override_resolver::{LocalOverrideResolver, OVERRIDE_TTL};
