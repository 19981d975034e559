//! Transposes each duplicate-file group from a list of (folder, name)
//! pairs into a pair of parallel lists — the folders involved, and the
//! filenames used in each of those folders.

use std::rc::Rc;

use crate::grouping::DuplicateGroup;
use crate::record::Parent;

/// The folders a duplicate-file group spans, and the filename used in each
/// of those folders, held as parallel vectors (`parents[i]` pairs with
/// `names[i]`).
#[derive(Clone, Debug, PartialEq)]
pub struct TransposedEntry {
    pub parents: Vec<Parent>,
    pub names: Vec<Rc<str>>,
}

/// Transpose one duplicate-file group. `group.entries` is assumed already in
/// the order the caller wants preserved — [`TransposedEntry`] does not
/// re-sort it.
pub fn transpose(group: &DuplicateGroup) -> TransposedEntry {
    let mut parents = Vec::with_capacity(group.entries.len());
    let mut names = Vec::with_capacity(group.entries.len());
    for entry in &group.entries {
        parents.push(entry.parent.clone());
        names.push(entry.name.clone());
    }
    TransposedEntry { parents, names }
}

/// Transpose every group in `groups`, preserving group order.
pub fn transpose_all(groups: &[DuplicateGroup]) -> Vec<TransposedEntry> {
    groups.iter().map(transpose).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::DuplicateEntry;
    use crate::record::Fingerprint;

    fn entry(parent: &str, name: &str) -> DuplicateEntry {
        DuplicateEntry {
            parent: Parent::from_components(parent.split('/').filter(|s| !s.is_empty())),
            name: Rc::from(name),
            mtime: 0.0,
        }
    }

    #[test]
    fn parents_and_names_stay_parallel() {
        let group = DuplicateGroup {
            fingerprint: Fingerprint::new(10, "hash"),
            entries: vec![entry("a", "x.txt"), entry("b", "y.txt")],
        };
        let transposed = transpose(&group);
        assert_eq!(transposed.parents.len(), 2);
        assert_eq!(transposed.names.len(), 2);
        assert_eq!(&*transposed.names[0], "x.txt");
        assert_eq!(&*transposed.names[1], "y.txt");
    }
}
