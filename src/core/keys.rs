//! Reserved field names

use std::borrow::Cow;

/// Entry timestamp, always written by the formatter.
pub const TIME: &str = "time";
/// Entry severity, always written by the formatter.
pub const LEVEL: &str = "level";
/// Entry message, always written by the formatter.
pub const MESSAGE: &str = "msg";

pub const SCOPE: &str = "scope";
pub const LOG_TYPE: &str = "type";
pub const INSTANCE: &str = "instance";
pub const APP_ID: &str = "app_id";
pub const VERSION: &str = "ver";

/// Prefix for caller fields that collide with an entry key.
pub const CLASH_PREFIX: &str = "fields.";

/// Keys the formatter owns. Caller fields may not shadow them.
pub const ENTRY_KEYS: [&str; 3] = [TIME, LEVEL, MESSAGE];

/// Key under which a caller field named `key` is written.
///
/// Entry keys gain [`CLASH_PREFIX`], repeated until the result names no
/// other caller field, so a rename never overwrites a real key.
pub fn resolve_field_key<'a, F>(key: &'a str, is_taken: F) -> Cow<'a, str>
where
    F: Fn(&str) -> bool,
{
    if !ENTRY_KEYS.iter().any(|reserved| *reserved == key) {
        return Cow::Borrowed(key);
    }
    let mut resolved = format!("{}{}", CLASH_PREFIX, key);
    while is_taken(&resolved) {
        resolved.insert_str(0, CLASH_PREFIX);
    }
    Cow::Owned(resolved)
}
