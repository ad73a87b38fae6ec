//! Cyclic previous/next resolution over the ordered dish id list

use crate::core::error::NavigationError;
use serde::{Deserialize, Serialize};

/// The ids adjacent to a dish in the cyclic ordering of all dishes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    pub previous: String,
    pub next: String,
}

impl Neighbors {
    /// Shorthand for [`resolve`]
    pub fn of(ids: &[String], current: &str) -> Result<Self, NavigationError> {
        resolve(ids, current)
    }
}

/// Resolve the previous and next ids of `current`, wrapping at both ends.
///
/// Fails when `ids` is empty or does not contain `current`.
///
/// ```
/// use dishdetail::core::neighbors::resolve;
///
/// let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let n = resolve(&ids, "a").unwrap();
/// assert_eq!((n.previous.as_str(), n.next.as_str()), ("c", "b"));
/// ```
pub fn resolve(ids: &[String], current: &str) -> Result<Neighbors, NavigationError> {
    if ids.is_empty() {
        return Err(NavigationError::EmptyList);
    }

    let index = ids
        .iter()
        .position(|id| id == current)
        .ok_or_else(|| NavigationError::NotFound {
            id: current.to_string(),
        })?;

    Ok(at_index(ids, index as isize))
}

/// Resolve neighbors treating a missing `current` as index -1.
///
/// Reproduces what the web page did before ids were checked: an unknown id
/// yields `ids[n - 2]` and `ids[0]`. Only an empty list fails.
pub fn resolve_lenient(ids: &[String], current: &str) -> Result<Neighbors, NavigationError> {
    if ids.is_empty() {
        return Err(NavigationError::EmptyList);
    }

    let index = ids
        .iter()
        .position(|id| id == current)
        .map_or(-1, |i| i as isize);

    Ok(at_index(ids, index))
}

fn at_index(ids: &[String], index: isize) -> Neighbors {
    let n = ids.len() as isize;
    let previous = (n + index - 1).rem_euclid(n) as usize;
    let next = (n + index + 1).rem_euclid(n) as usize;

    Neighbors {
        previous: ids[previous].clone(),
        next: ids[next].clone(),
    }
}
