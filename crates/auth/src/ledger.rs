//! Revocation ledger: per-subject monotonic epoch counters.
//!
//! A refresh token minted at epoch `e` is honored only while the subject's
//! current epoch is still `e`. Bumping the counter therefore invalidates
//! every outstanding refresh token at its next use, without tracking the
//! tokens themselves.

use std::collections::HashMap;
use std::sync::Mutex;

use huddle_core::SubjectId;

/// Epoch read/advance contract.
///
/// Implementations must be linearizable per subject: two concurrent bumps
/// may interleave in either order but can never collapse to the same
/// resulting epoch.
pub trait RevocationLedger: Send + Sync {
    /// Current epoch for a subject. Unseen subjects are at epoch 0.
    fn current_epoch(&self, subject: SubjectId) -> u64;

    /// Advance the subject's epoch and return the new value.
    /// Strictly increasing; idempotence is a non-goal (logout twice bumps
    /// twice, which is harmless).
    fn bump(&self, subject: SubjectId) -> u64;
}

/// Process-local ledger.
///
/// Suitable for a single-instance deployment only: epochs do not survive a
/// restart and are not shared across replicas. A shared keyed store behind
/// the same trait lifts both limitations.
#[derive(Debug, Default)]
pub struct InMemoryRevocationLedger {
    epochs: Mutex<HashMap<SubjectId, u64>>,
}

impl InMemoryRevocationLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationLedger for InMemoryRevocationLedger {
    fn current_epoch(&self, subject: SubjectId) -> u64 {
        self.epochs
            .lock()
            .expect("ledger mutex poisoned")
            .get(&subject)
            .copied()
            .unwrap_or(0)
    }

    fn bump(&self, subject: SubjectId) -> u64 {
        // Increment under the lock: read-modify-write races are impossible.
        let mut epochs = self.epochs.lock().expect("ledger mutex poisoned");
        let epoch = epochs.entry(subject).or_insert(0);
        *epoch += 1;
        *epoch
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn unseen_subject_is_at_epoch_zero() {
        let ledger = InMemoryRevocationLedger::new();
        assert_eq!(ledger.current_epoch(SubjectId::new()), 0);
    }

    #[test]
    fn bump_is_strictly_increasing() {
        let ledger = InMemoryRevocationLedger::new();
        let subject = SubjectId::new();

        assert_eq!(ledger.bump(subject), 1);
        assert_eq!(ledger.bump(subject), 2);
        assert_eq!(ledger.current_epoch(subject), 2);
    }

    #[test]
    fn subjects_are_independent() {
        let ledger = InMemoryRevocationLedger::new();
        let a = SubjectId::new();
        let b = SubjectId::new();

        ledger.bump(a);
        assert_eq!(ledger.current_epoch(a), 1);
        assert_eq!(ledger.current_epoch(b), 0);
    }

    #[test]
    fn concurrent_bumps_never_collapse() {
        // N concurrent bumps must advance the epoch by exactly N.
        let ledger = Arc::new(InMemoryRevocationLedger::new());
        let subject = SubjectId::new();
        let n = 64;

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.bump(subject))
            })
            .collect();

        let mut seen: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        seen.sort_unstable();

        // Every bump observed a distinct epoch, and the final value is N.
        assert_eq!(seen, (1..=n).collect::<Vec<_>>());
        assert_eq!(ledger.current_epoch(subject), n);
    }

    proptest! {
        #[test]
        fn epoch_equals_number_of_bumps(bumps in 0usize..200) {
            let ledger = InMemoryRevocationLedger::new();
            let subject = SubjectId::new();

            for i in 0..bumps {
                prop_assert_eq!(ledger.bump(subject), (i + 1) as u64);
            }
            prop_assert_eq!(ledger.current_epoch(subject), bumps as u64);
        }
    }
}
