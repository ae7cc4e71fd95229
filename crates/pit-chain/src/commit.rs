use pit_index::IndexSnapshot;
use pit_types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};

/// An immutable commit record.
///
/// The serialized form is canonical: fields are emitted in declaration order
/// and `files` is sorted by path, so the commit ID (the digest of the text) is
/// a pure function of the commit's contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Free-text description, never blank.
    pub message: String,
    /// When the commit was created.
    pub timestamp: Timestamp,
    /// Copy of the staging index at commit time.
    pub files: IndexSnapshot,
    /// The previous commit, or `None` for a root commit.
    pub parent: Option<ObjectId>,
}

impl Commit {
    pub fn new(
        message: impl Into<String>,
        timestamp: Timestamp,
        files: IndexSnapshot,
        parent: Option<ObjectId>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp,
            files,
            parent,
        }
    }

    /// Canonical text encoding (pretty-printed JSON).
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Decode from the canonical text encoding.
    pub fn from_text(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The ID this commit is stored under.
    pub fn id(&self) -> Result<ObjectId, serde_json::Error> {
        Ok(ObjectId::from_content(self.to_text()?.as_bytes()))
    }

    /// Returns `true` for a commit with no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_index::IndexEntry;

    fn files(pairs: &[(&str, &[u8])]) -> IndexSnapshot {
        pairs
            .iter()
            .map(|(path, content)| {
                (
                    path.to_string(),
                    IndexEntry::new(ObjectId::from_content(content), Timestamp::from_secs(1)),
                )
            })
            .collect()
    }

    #[test]
    fn text_roundtrip() {
        let parent = ObjectId::from_content(b"parent");
        let commit = Commit::new("msg", Timestamp::from_secs(10), files(&[("a", b"a")]), Some(parent));
        let text = commit.to_text().unwrap();
        assert_eq!(Commit::from_text(&text).unwrap(), commit);
    }

    #[test]
    fn field_order_is_fixed() {
        let commit = Commit::new("m", Timestamp::from_secs(1), files(&[("a", b"a")]), None);
        let text = commit.to_text().unwrap();
        let pos = |key: &str| text.find(&format!("\"{key}\"")).unwrap();
        assert!(pos("message") < pos("timestamp"));
        assert!(pos("timestamp") < pos("files"));
        assert!(pos("files") < pos("parent"));
        assert!(text.contains("\"parent\": null"));
    }

    #[test]
    fn id_ignores_insertion_order() {
        let mut a = IndexSnapshot::new();
        let mut b = IndexSnapshot::new();
        let e1 = IndexEntry::new(ObjectId::from_content(b"1"), Timestamp::zero());
        let e2 = IndexEntry::new(ObjectId::from_content(b"2"), Timestamp::zero());
        a.insert("x".into(), e1.clone());
        a.insert("y".into(), e2.clone());
        b.insert("y".into(), e2);
        b.insert("x".into(), e1);

        let ca = Commit::new("m", Timestamp::zero(), a, None);
        let cb = Commit::new("m", Timestamp::zero(), b, None);
        assert_eq!(ca.id().unwrap(), cb.id().unwrap());
    }

    #[test]
    fn id_depends_on_parent() {
        let f = files(&[("a", b"a")]);
        let root = Commit::new("m", Timestamp::zero(), f.clone(), None);
        let child = Commit::new("m", Timestamp::zero(), f, Some(root.id().unwrap()));
        assert!(root.is_root());
        assert!(!child.is_root());
        assert_ne!(root.id().unwrap(), child.id().unwrap());
    }
}
