//! Name comparison policy
//!
//! Resource names, hostnames and DNS record names are compared
//! case-insensitively. Storage file paths are compared exactly.

use thiserror::Error;

/// More than one remote entity matched a name that must be unique
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{count} entries match '{name}', expected at most one")]
pub struct AmbiguousMatch {
    pub name: String,
    pub count: usize,
}

/// Compare resource, hostname or record names
pub fn names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Compare normalized relative file paths
pub fn paths_match(a: &str, b: &str) -> bool {
    a == b
}

/// Find the single item whose key matches `name` case-insensitively.
///
/// Returns `Ok(None)` when nothing matches and an error when several do.
pub fn find_single<'a, T, F>(
    items: &'a [T],
    name: &str,
    key: F,
) -> Result<Option<&'a T>, AmbiguousMatch>
where
    F: Fn(&T) -> &str,
{
    let mut matches = items.iter().filter(|&item| names_match(key(item), name));
    let first = matches.next();
    let rest = matches.count();
    if rest > 0 {
        return Err(AmbiguousMatch {
            name: name.to_string(),
            count: rest + 1,
        });
    }
    Ok(first)
}
