pub mod tag_reconciliation;

pub use tag_reconciliation::*;
