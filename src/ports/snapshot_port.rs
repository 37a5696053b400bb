//! Persisted snapshot port trait.

use crate::domain::error::TiercastError;
use crate::domain::snapshot::Snapshot;

pub trait SnapshotPort {
    /// `None` on first run (no file yet).
    fn load(&self) -> Result<Option<Snapshot>, TiercastError>;

    /// Full overwrite, no partial writes.
    fn store(&self, snapshot: &Snapshot) -> Result<(), TiercastError>;
}
