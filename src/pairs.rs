//! The pair expander and pair merger: turns each folder group of `k`
//! folders into its `k·(k-1)/2` ordered pairs, then merges pairs that recur
//! across different folder groups.

use std::rc::Rc;

use crate::collapse::FolderGroup;
use crate::record::Parent;

/// One file shared between the two folders of a [`FolderPair`].
pub type FilePair = (Rc<str>, Rc<str>);

/// Two folders and the files they share, by filename in each side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FolderPair {
    pub a: Parent,
    pub b: Parent,
    pub file_pairs: Vec<FilePair>,
}

/// Expand every folder group into all of its `i < j` folder pairs.
///
/// A group of `k` folders yields `k·(k-1)/2` pairs. Pair ordering within a
/// group is emission order, `(parents[i], parents[j])` for `i < j` as the
/// group's own `parents` vector lists them — it is not re-canonicalized to
/// `(min, max)` here. [`merge_pairs`]'s sort is what brings equal pairs
/// together regardless of which side ends up first in a given group, so
/// the two folders of a pair can legitimately appear swapped across two
/// different groups; see the module-level note on pair identity.
pub fn expand_pairs(groups: &[FolderGroup]) -> Vec<FolderPair> {
    let mut pairs = Vec::new();
    for group in groups {
        let k = group.parents.len();
        for i in 0..k {
            for j in (i + 1)..k {
                let file_pairs: Vec<FilePair> = group
                    .name_rows
                    .iter()
                    .map(|row| (row[i].clone(), row[j].clone()))
                    .collect();
                pairs.push(FolderPair {
                    a: group.parents[i].clone(),
                    b: group.parents[j].clone(),
                    file_pairs,
                });
            }
        }
    }
    pairs
}

/// Sort `pairs` by `(a, b)` and merge adjacent pairs with an identical
/// `(a, b)`, concatenating (not deduplicating) their file-pair lists.
///
/// Two proto-pairs merge only when their folder pair is an exact,
/// same-order match. A pair whose folders show up as `(x, y)` in one group
/// and `(y, x)` in another is **not** collapsed into one entry by this pass
/// — folder-pair identity is emission order, not a canonicalized
/// `(min, max)` tuple, because upstream folder lists are only canonical
/// within a single folder group, not across groups. Deduplicating the
/// resulting `file_pairs` list is likewise not performed: if the same file
/// pair is contributed by two different folder groups that happen to
/// collapse to the same folder pair, it appears twice.
pub fn merge_pairs(pairs: Vec<FolderPair>) -> Vec<FolderPair> {
    let mut pairs = pairs;
    pairs.sort_by(|p, q| (&p.a, &p.b).cmp(&(&q.a, &q.b)));

    let mut merged: Vec<FolderPair> = Vec::new();
    for pair in pairs {
        if let Some(last) = merged.last_mut() {
            if last.a == pair.a && last.b == pair.b {
                last.file_pairs.extend(pair.file_pairs);
                continue;
            }
        }
        merged.push(pair);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(s: &str) -> Parent {
        Parent::from_components(s.split('/').filter(|c| !c.is_empty()))
    }

    fn name_row(names: &[&str]) -> Vec<Rc<str>> {
        names.iter().map(|n| Rc::from(*n)).collect()
    }

    #[test]
    fn expand_emits_triangular_pairs() {
        let group = FolderGroup {
            parents: vec![parent("a"), parent("b"), parent("c")],
            name_rows: vec![name_row(&["1.txt", "2.txt", "3.txt"])],
        };
        let pairs = expand_pairs(&[group]);
        // k=3 -> 3 pairs: (a,b) (a,c) (b,c)
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].a, parent("a"));
        assert_eq!(pairs[0].b, parent("b"));
        assert_eq!(pairs[2].a, parent("b"));
        assert_eq!(pairs[2].b, parent("c"));
    }

    #[test]
    fn expand_count_matches_k_choose_2() {
        let group = FolderGroup {
            parents: (0..5).map(|i| parent(&format!("f{i}"))).collect(),
            name_rows: vec![name_row(&["1", "2", "3", "4", "5"])],
        };
        let pairs = expand_pairs(&[group]);
        assert_eq!(pairs.len(), 5 * 4 / 2);
    }

    #[test]
    fn merge_concatenates_without_dedup() {
        let pairs = vec![
            FolderPair { a: parent("a"), b: parent("b"), file_pairs: vec![(Rc::from("1"), Rc::from("2"))] },
            FolderPair { a: parent("a"), b: parent("b"), file_pairs: vec![(Rc::from("1"), Rc::from("2"))] },
        ];
        let merged = merge_pairs(pairs);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].file_pairs.len(), 2);
    }
}
