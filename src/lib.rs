use std::env;

pub mod meta;
pub mod util;
pub mod frontend;

/// get key from environment variable, or default if it's not defined
pub fn parse_env(key: &str, default: &str) -> String {
    match env::var_os(key) {
        Some(value) => value.into_string().unwrap_or_else(|_| String::from(default)),
        None => String::from(default),
    }
}
