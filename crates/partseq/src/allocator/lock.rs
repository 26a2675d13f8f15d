use std::{collections::HashMap, sync::Arc};

use crate::{
    Partition, Result,
    allocator::{Mutex, MutexGuard},
};

/// A table of per-partition mutexes.
///
/// Allocations in the same [`Partition`] run one at a time; allocations in
/// different partitions never wait on each other. Entries are created on first
/// use and dropped again once no allocation holds or waits on them, so the
/// table only ever contains partitions that are currently busy.
///
/// Share one table (behind an [`Arc`]) between every allocator that writes to
/// the same store.
#[derive(Default)]
pub struct PartitionLocks {
    table: Mutex<HashMap<Partition, Arc<Mutex<()>>>>,
}

impl PartitionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `partition`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if a previous holder panicked (only
    /// without the `parking-lot` feature).
    ///
    /// [`Error::LockPoisoned`]: crate::Error
    pub fn with_lock<R>(&self, partition: &Partition, f: impl FnOnce() -> R) -> Result<R> {
        let entry = {
            let mut table = self.table()?;
            Arc::clone(table.entry(partition.clone()).or_default())
        };

        let result = {
            #[cfg(feature = "parking-lot")]
            let _guard = entry.lock();
            #[cfg(not(feature = "parking-lot"))]
            let _guard = entry.lock()?;
            f()
        };

        // Clones are only handed out, and released, under the table lock, so a
        // count of two (the table's and ours) means nobody else is holding or
        // waiting.
        let mut table = self.table()?;
        if Arc::strong_count(&entry) == 2 {
            table.remove(partition);
        }
        drop(entry);
        drop(table);
        Ok(result)
    }

    /// Number of partitions currently locked or waited on.
    pub fn len(&self) -> usize {
        self.table().map_or(0, |t| t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> Result<MutexGuard<'_, HashMap<Partition, Arc<Mutex<()>>>>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.table.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.table.lock()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variant;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread::scope,
        time::Duration,
    };

    #[test]
    fn entries_are_dropped_after_use() {
        let locks = PartitionLocks::new();
        let p = Partition::new("1234", Variant::Primary);
        let value = locks.with_lock(&p, || 7).unwrap();
        assert_eq!(value, 7);
        assert!(locks.is_empty());
    }

    #[test]
    fn same_partition_is_serialized() {
        let locks = PartitionLocks::new();
        let p = Partition::new("1234", Variant::Primary);
        let inside = AtomicUsize::new(0);
        let max_inside = AtomicUsize::new(0);

        scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    locks
                        .with_lock(&p, || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_inside.fetch_max(now, Ordering::SeqCst);
                            std::thread::sleep(Duration::from_millis(2));
                            inside.fetch_sub(1, Ordering::SeqCst);
                        })
                        .unwrap();
                });
            }
        });

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[test]
    fn different_partitions_do_not_block() {
        let locks = PartitionLocks::new();
        let a = Partition::new("1234", Variant::Primary);
        let b = Partition::new("1234", Variant::NonPrimary);

        // Holding `a` while taking `b` on the same thread would deadlock if
        // the two shared a mutex.
        let nested = locks
            .with_lock(&a, || locks.with_lock(&b, || "ok").unwrap())
            .unwrap();
        assert_eq!(nested, "ok");
        assert!(locks.is_empty());
    }
}
