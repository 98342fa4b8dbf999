mod env;
mod secret;

pub use env::{env_flag, env_or_default, env_parse_or_default, parse_boolean_flag};
pub use secret::Secret;
