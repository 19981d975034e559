//! Builds the [`tree`] from an index, propagates per-folder counters
//! bottom-up, and prunes subtrees that turn out to hold nothing
//! interesting.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::record::{Parent, Record};
use crate::tree::{FolderNode, NodeRef};

/// Build the folder tree from a flat record list: one folder chain per
/// record's parent path, with the record's (hash, size) attached to the
/// folder it lives in directly via `hash_sizes`.
///
/// `num_files_in_subtree`/`bytes_in_subtree` are deliberately left at their
/// `Default` zero here — [`aggregate_and_prune`] derives `files_here`/
/// `size_here` straight from `hash_sizes` at rollup time, so pre-populating
/// these two aggregate fields from the same records here would double-count
/// every node's own direct files once the bottom-up pass adds `files_here`/
/// `size_here` into the parent on top of them.
pub fn build_tree(records: &[Record]) -> NodeRef {
    let root = FolderNode::new_root("");
    for record in records {
        let node = FolderNode::insert_at_path(&root, record.parent.components().iter().cloned());
        node.borrow_mut()
            .cargo
            .hash_sizes
            .insert(Rc::clone(&record.fingerprint.hash), record.fingerprint.size);
    }
    root
}

/// Walk down from `root` following `parent`'s components, returning the
/// node at that path if every component along the way already exists.
fn find_node(root: &NodeRef, parent: &Parent) -> Option<NodeRef> {
    FolderNode::get_by_path(root, parent.components().iter())
}

/// Precompute the inverted index a hash's `dup_candidates` are supplied
/// from: every distinct folder path that has at least one file with that
/// hash anywhere in the index. Folder paths are interned so that two
/// records in the same folder share one `Rc<str>` rather than each
/// allocating their own copy of the path.
fn build_hash_candidates(records: &[Record]) -> HashMap<Rc<str>, HashSet<Rc<str>>> {
    let mut interned: HashMap<String, Rc<str>> = HashMap::new();
    let mut index: HashMap<Rc<str>, HashSet<Rc<str>>> = HashMap::new();
    for record in records {
        let path = interned
            .entry(record.parent.display())
            .or_insert_with_key(|path| Rc::from(path.as_str()))
            .clone();
        index.entry(Rc::clone(&record.fingerprint.hash)).or_default().insert(path);
    }
    index
}

/// For every record, look up its hash in the precomputed inverted index and
/// union those candidate folder paths into the folder it directly lives in.
/// A folder whose own path is the *only* candidate for every hash it holds
/// has nothing in common with any other folder; [`aggregate_and_prune`]
/// uses exactly that to decide what survives.
///
/// A folder contributing more than one file under the same hash (two
/// copies sitting side by side) still only adds its own path once, since
/// `dup_candidates` is a set of folders, not files — but the folder still
/// only counts as one candidate among its peers regardless of how many of
/// its own files share that hash, matching the upstream counting that the
/// rest of this pipeline's open questions note is otherwise file-grained.
pub fn mark_duplicate_candidates(root: &NodeRef, records: &[Record]) {
    let hash_candidates = build_hash_candidates(records);
    for record in records {
        let Some(node) = find_node(root, &record.parent) else { continue };
        let Some(candidates) = hash_candidates.get(&record.fingerprint.hash) else { continue };
        node.borrow_mut().cargo.dup_candidates.extend(candidates.iter().cloned());
    }
}

/// Bottom-up pass: for every non-root node, fold its own direct files
/// (`hash_sizes`) together with whatever its children already pushed up
/// into it, push that total into its parent, then prune it if it turns
/// out to be a leaf with nothing shared.
///
/// The push into the parent happens *before* the prune check, not after —
/// a node's contribution must reach its parent's counters even if the node
/// itself is about to be removed, since removal only means "nothing left
/// to report here", not "this subtree never existed". Visiting
/// grandchildren before children before parents (the traversal's own
/// postorder) is what makes a single pass sufficient: by the time a node N
/// is processed, every number it needs from its descendants already landed
/// in `N.cargo`.
///
/// Because pruning removes the child from its parent's map immediately,
/// a parent can become childless before its own turn is processed later in
/// the same pass — and a childless folder with nothing of its own to share
/// is just as prunable as the leaf that vacated it. That cascade is
/// intentional: see the worked example in the module tests.
pub fn aggregate_and_prune(root: &NodeRef) {
    FolderNode::traverse_bottomup(root, |node| {
        let (size_here, files_here) = {
            let n = node.borrow();
            let size_here: u64 = n.cargo.hash_sizes.values().sum();
            let files_here = n.cargo.hash_sizes.len() as u64;
            (size_here, files_here)
        };

        if let Some(parent) = FolderNode::parent_node(node) {
            let (subtree_files, subtree_bytes) = {
                let n = node.borrow();
                (n.cargo.num_files_in_subtree, n.cargo.bytes_in_subtree)
            };
            let mut p = parent.borrow_mut();
            p.cargo.num_subfolders += 1;
            p.cargo.num_files_in_subtree += subtree_files + files_here;
            p.cargo.bytes_in_subtree += subtree_bytes + size_here;
        }

        let prunable = FolderNode::is_leaf(node) && node.borrow().cargo.dup_candidates.len() <= 1;
        if prunable {
            if let Some(parent) = FolderNode::parent_node(node) {
                let name = Rc::clone(&node.borrow().name);
                FolderNode::remove_child(&parent, &name);
            }
        }
    });
}

/// Run the full statistics pass: build, mark candidates, aggregate+prune.
pub fn run_statistics_pass(records: &[Record]) -> NodeRef {
    let root = build_tree(records);
    mark_duplicate_candidates(&root, records);
    aggregate_and_prune(&root);
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(size: u64, hash: &str, parent: &str, name: &str) -> Record {
        Record::new(
            size,
            hash,
            0.0,
            Parent::from_components(parent.split('/').filter(|s| !s.is_empty())),
            name,
        )
    }

    /// A hash unique to `f3/f8` prunes not just that leaf but also `f3`
    /// once `f3/f8`'s removal leaves it childless with only itself as a
    /// candidate.
    #[test]
    fn unique_file_prunes_the_whole_unshared_chain() {
        let records = vec![rec(10, "only", "f3/f8", "solo.txt")];
        let root = run_statistics_pass(&records);
        assert!(root.borrow().children.get("f3").is_none());
    }

    #[test]
    fn shared_hash_keeps_both_folders_with_each_other_as_candidate() {
        let records = vec![rec(10, "dup", "a/b", "one.txt"), rec(10, "dup", "c/d", "two.txt")];
        let root = build_tree(&records);
        mark_duplicate_candidates(&root, &records);

        let b = find_node(&root, &Parent::from_components(["a", "b"])).unwrap();
        // Candidate for "dup" is the set of folders holding it: a/b and c/d.
        assert_eq!(b.borrow().cargo.dup_candidates.len(), 2);

        aggregate_and_prune(&root);
        // Both survive: each is the other's peer, not just itself.
        assert!(find_node(&root, &Parent::from_components(["a", "b"])).is_some());
        assert!(find_node(&root, &Parent::from_components(["c", "d"])).is_some());
    }

    #[test]
    fn byte_and_file_counts_roll_up_to_root_even_when_pruned() {
        let records = vec![rec(5, "h1", "a", "one.txt"), rec(7, "h2", "a/b", "two.txt")];
        let root = run_statistics_pass(&records);
        // Both h1 and h2 are unique, so "a" and "a/b" both end up pruned --
        // but their contribution still reached root before removal.
        assert_eq!(root.borrow().cargo.bytes_in_subtree, 12);
        assert_eq!(root.borrow().cargo.num_files_in_subtree, 2);
        assert!(root.borrow().children.get("a").is_none());
    }
}
