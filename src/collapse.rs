//! Merges transposed entries that involve exactly the same set of folders
//! (in the same order) into a single folder group, collecting one filename
//! row per duplicate-file group that contributed to it.

use std::rc::Rc;

use crate::record::Parent;
use crate::transpose::TransposedEntry;

/// A set of folders that recur together across one or more duplicate-file
/// groups, plus one "row" of filenames per contributing group.
///
/// `name_rows[i][j]` is the filename used in `parents[j]` by the `i`-th
/// duplicate-file group that shared this exact folder set.
#[derive(Clone, Debug, PartialEq)]
pub struct FolderGroup {
    pub parents: Vec<Parent>,
    pub name_rows: Vec<Vec<Rc<str>>>,
}

/// Sort `entries` by their folder-list and merge adjacent entries whose
/// folder lists are identical, combining their filename rows.
///
/// Two transposed entries merge only if their `parents` vectors are equal
/// element-for-element, including order — folders `[a, b]` and `[b, a]` are
/// treated as distinct folder sets, matching the upstream sort key used to
/// bring equal folder-lists adjacent in the first place.
pub fn collapse_folder_groups(entries: Vec<TransposedEntry>) -> Vec<FolderGroup> {
    let mut entries = entries;
    entries.sort_by(|a, b| a.parents.cmp(&b.parents));

    let mut groups: Vec<FolderGroup> = Vec::new();
    for entry in entries {
        if let Some(last) = groups.last_mut() {
            if last.parents == entry.parents {
                last.name_rows.push(entry.names);
                continue;
            }
        }
        groups.push(FolderGroup {
            parents: entry.parents,
            name_rows: vec![entry.names],
        });
    }
    groups
}
