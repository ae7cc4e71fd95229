use pit_chain::Commit;
use pit_types::{ObjectId, Timestamp};

/// One line of history, as shown by `log`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSummary {
    pub id: ObjectId,
    pub parent: Option<ObjectId>,
    pub message: String,
    pub timestamp: Timestamp,
    pub file_count: usize,
}

impl CommitSummary {
    pub fn new(id: ObjectId, commit: &Commit) -> Self {
        Self {
            id,
            parent: commit.parent,
            message: commit.message.clone(),
            timestamp: commit.timestamp,
            file_count: commit.files.len(),
        }
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pit_index::IndexSnapshot;

    #[test]
    fn subject_is_first_line() {
        let commit = Commit::new("title\n\nbody", Timestamp::from_secs(3), IndexSnapshot::new(), None);
        let id = ObjectId::from_content(b"c");
        let summary = CommitSummary::new(id, &commit);
        assert_eq!(summary.subject(), "title");
        assert_eq!(summary.file_count, 0);
        assert_eq!(summary.timestamp, Timestamp::from_secs(3));
        assert!(summary.parent.is_none());
    }
}
