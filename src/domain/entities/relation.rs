/// Result of inserting a join row (follow, favorite, article tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    AlreadyExists,
}

impl LinkOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            LinkOutcome::Created
        } else {
            LinkOutcome::AlreadyExists
        }
    }
}

/// Result of deleting a join row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlinkOutcome {
    Removed,
    AlreadyAbsent,
}

impl UnlinkOutcome {
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows > 0 {
            UnlinkOutcome::Removed
        } else {
            UnlinkOutcome::AlreadyAbsent
        }
    }
}
