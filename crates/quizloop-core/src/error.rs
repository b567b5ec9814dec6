//! Persistence error types.
//!
//! These error types represent failures when talking to a progress store.
//! Defined in `quizloop-core` so the persistence helper can downcast and
//! classify errors for retry decisions without string matching.

use thiserror::Error;

/// Errors that can occur when interacting with a progress store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed")]
    Io(#[from] std::io::Error),

    /// The stored document could not be decoded.
    #[error("store data is corrupt: {0}")]
    Corrupt(String),

    /// The store is temporarily unreachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// No progress has been recorded for this learner.
    #[error("learner not found: {0}")]
    LearnerNotFound(String),
}

impl StoreError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            StoreError::Corrupt(_) | StoreError::LearnerNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_permanent_errors() {
        assert!(StoreError::Corrupt("bad json".into()).is_permanent());
        assert!(StoreError::LearnerNotFound("ana".into()).is_permanent());
        assert!(!StoreError::Unavailable("locked".into()).is_permanent());
        let io = std::io::Error::new(std::io::ErrorKind::Interrupted, "eintr");
        assert!(!StoreError::from(io).is_permanent());
    }

    #[test]
    fn io_detail_appears_once_in_alternate_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = anyhow::Error::from(StoreError::from(io));
        let rendered = format!("{err:#}");
        assert_eq!(rendered, "store I/O failed: disk on fire");
        assert_eq!(rendered.matches("disk on fire").count(), 1);
    }
}
