//! The indivisible unit the rest of the pipeline operates on: one line of an
//! index file, parsed into a size+hash fingerprint and a decomposed path.

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::error::RecordParseError;

/// Width an index file right-justifies the byte-size column to.
///
/// Matches the original walker's fixed `size_digits = 13` column, wide
/// enough for any file on a real filesystem while keeping the column's text
/// order identical to its numeric order.
pub const SIZE_WIDTH: usize = 13;

/// A single path component, cheaply cloned and shared across every record
/// and derived group that references the same folder.
pub type Component = Rc<str>;

/// A decomposed directory path: the ordered sequence of its components.
///
/// Comparisons are component-wise, never on a re-joined path string — a
/// folder named `a` must sort before a folder named `a-b`, which a naive
/// string comparison of `"a"` vs `"a-b"` would already get right, but one of
/// `"a/z"` vs `"a-b/a"` would not: joined, `"a-b/a"` < `"a/z"` lexically
/// because `-` (0x2D) sorts before `/` (0x2F), even though `a` sorts before
/// `a-b`. Comparing the SmallVec of components directly avoids that.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Parent(SmallVec<[Component; 4]>);

/// Serialized as the `/`-joined display form rather than a component array:
/// JSON consumers want a path string, not the internal decomposition this
/// type exists to give the comparison operators.
#[cfg(feature = "json")]
impl serde::Serialize for Parent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display())
    }
}

impl Parent {
    pub fn from_components<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Parent(parts.into_iter().map(|s| Rc::from(s.as_ref())).collect())
    }

    pub fn components(&self) -> &[Component] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render back into a platform-independent `/`-joined path for display.
    pub fn display(&self) -> String {
        self.0.iter().map(|c| c.as_ref()).collect::<Vec<_>>().join("/")
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Size and content hash together identify "the same file content"
/// regardless of where it lives. Equality (not similarity) is the only
/// relation this type supports.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Fingerprint {
    pub size: u64,
    pub hash: Rc<str>,
}

impl Fingerprint {
    pub fn new(size: u64, hash: impl Into<Rc<str>>) -> Self {
        Fingerprint { size, hash: hash.into() }
    }

    /// The right-justified-size-then-hash text rendering the report format
    /// uses as a stable sort key. `Fingerprint`'s own `Ord` is numeric on
    /// `size` and is equivalent to this ordering for any hash alphabet that
    /// doesn't exceed [`SIZE_WIDTH`] digits of size.
    pub fn sort_key_text(&self) -> String {
        format!("{:>width$} {}", self.size, self.hash, width = SIZE_WIDTH)
    }
}

/// One parsed line of an index file.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub fingerprint: Fingerprint,
    pub mtime: f64,
    pub parent: Parent,
    pub name: Rc<str>,
}

impl Record {
    pub fn new(size: u64, hash: impl Into<Rc<str>>, mtime: f64, parent: Parent, name: impl Into<Rc<str>>) -> Self {
        Record {
            fingerprint: Fingerprint::new(size, hash),
            mtime,
            parent,
            name: name.into(),
        }
    }

    /// Parse one `size\tmtime\thash\tpath` index line.
    ///
    /// The path field is split on `/` to produce [`Parent`] components plus
    /// a filename; it is not re-split on tabs, so a path containing a
    /// literal tab survives intact (the split uses `splitn(4, '\t')`, not
    /// `split('\t')`).
    pub fn parse_line(file: &Path, line_no: usize, line: &str) -> Result<Self, RecordParseError> {
        let err = |reason: &str| RecordParseError {
            file: file.to_path_buf(),
            line: line_no,
            reason: reason.to_string(),
        };

        let mut fields = line.splitn(4, '\t');
        let size_field = fields.next().ok_or_else(|| err("missing size field"))?;
        let mtime_field = fields.next().ok_or_else(|| err("missing mtime field"))?;
        let hash_field = fields.next().ok_or_else(|| err("missing hash field"))?;
        let path_field = fields.next().ok_or_else(|| err("missing path field"))?;

        let size: u64 = size_field
            .trim()
            .parse()
            .map_err(|_| err("size field is not an integer"))?;
        let mtime: f64 = mtime_field
            .trim()
            .parse()
            .map_err(|_| err("mtime field is not a float"))?;
        let hash = hash_field.trim();
        if hash.is_empty() {
            return Err(err("hash field is empty"));
        }

        let (parent, name) = split_path(path_field);
        if name.is_empty() {
            return Err(err("path field has no filename component"));
        }

        Ok(Record::new(size, hash, mtime, parent, name))
    }

    /// Render this record's line for a persisted index file.
    pub fn to_index_line(&self) -> String {
        let mut path = self.parent.display();
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(&self.name);
        format!(
            "{:>width$}\t{:10.4}\t{}\t{}",
            self.fingerprint.size,
            self.mtime,
            self.fingerprint.hash,
            path,
            width = SIZE_WIDTH
        )
    }
}

/// Split a `/`-joined path into its parent components and final filename.
fn split_path(path: &str) -> (Parent, Rc<str>) {
    let mut parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let name = parts.pop().unwrap_or_default();
    (Parent::from_components(parts), Rc::from(name))
}
