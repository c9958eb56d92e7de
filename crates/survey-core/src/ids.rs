//! ID prefix constants.
//!
//! IDs are formatted as `{prefix}-{8 hex chars}`, e.g. `ent-a3f8b2c1`.

pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_ENTITY: &str = "ent";
pub const PREFIX_SOURCE: &str = "src";
pub const PREFIX_EXTRACTION: &str = "ext";

/// Every prefix in use, for exhaustive ID tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_PROJECT,
    PREFIX_ENTITY,
    PREFIX_SOURCE,
    PREFIX_EXTRACTION,
];

/// Check that an ID carries the expected prefix and an 8-char hex suffix.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
