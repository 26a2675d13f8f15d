use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Allocation, AllocatorConfig, Error, LogSink, ParticipantId, Partition,
    PartitionLocks, Record, RecordFilter, RecordStore, RecordUpdate, Result, SEPARATOR,
    SaveEvent, ScannedId, SkipReason, Variant,
};

/// Allocates sequential participant identifiers, one partition at a time.
///
/// The allocator keeps no counters. Every allocation re-derives the next
/// sequence number from the identifiers already in the store, which keeps it
/// correct in the presence of identifiers inserted by hand or by other tools.
/// The scan, compute and write steps run inside the partition's critical
/// section (see [`PartitionLocks`]) so two concurrent save events can never
/// compute the same identifier.
///
/// ## Example
///
/// ```
/// use partseq::{Allocator, AllocatorConfig, MemoryLog, MemoryStore, Record, SaveEvent};
///
/// let store = MemoryStore::with_records(
///     "record_id",
///     [Record::from_iter([
///         ("record_id", "1"),
///         ("test", "1234"),
///         ("patient_status_2", "1"),
///     ])],
/// );
/// let allocator = Allocator::new(&store, MemoryLog::new(), AllocatorConfig::default());
///
/// let outcome = allocator.try_allocate(&SaveEvent::new("1", "42")).unwrap();
/// assert_eq!(outcome.assigned().unwrap().to_string(), "1234-001");
/// ```
pub struct Allocator<S, L>
where
    S: RecordStore,
    L: LogSink,
{
    store: S,
    log: L,
    config: AllocatorConfig,
    locks: Arc<PartitionLocks>,
}

impl<S, L> Allocator<S, L>
where
    S: RecordStore,
    L: LogSink,
{
    /// Creates an allocator with its own lock table.
    pub fn new(store: S, log: L, config: AllocatorConfig) -> Self {
        Self::with_locks(store, log, config, Arc::new(PartitionLocks::new()))
    }

    /// Creates an allocator that shares `locks` with other allocators writing
    /// to the same store.
    pub fn with_locks(
        store: S,
        log: L,
        config: AllocatorConfig,
        locks: Arc<PartitionLocks>,
    ) -> Self {
        Self {
            store,
            log,
            config,
            locks,
        }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn locks(&self) -> &Arc<PartitionLocks> {
        &self.locks
    }

    /// Handles one save event.
    ///
    /// Returns the outcome of the attempt. Skips and rejected writes are
    /// outcomes, not errors; both are also reported to the log sink (skips only
    /// when `verbose` is set).
    ///
    /// # Errors
    ///
    /// - [`Error::SequenceOverflow`] if the partition already holds an
    ///   identifier with sequence [`MAX_SEQUENCE`](crate::MAX_SEQUENCE).
    ///   Nothing is written.
    /// - [`Error::Store`] if the store cannot be read.
    /// - `Error::LockPoisoned` if a partition lock is poisoned.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(record_id = %event.record_id))
    )]
    pub fn try_allocate(&self, event: &SaveEvent) -> Result<Allocation> {
        if event.is_empty() {
            return Ok(self.skip(SkipReason::EmptyEvent, None));
        }

        let fields = &self.config.fields;
        let rid_field = self.store.record_id_field();
        let Some(record) = self
            .store
            .fetch_fields(
                RecordFilter::One(&event.record_id),
                &[
                    rid_field,
                    fields.partition_key.as_str(),
                    fields.variant_flag.as_str(),
                    fields.identifier.as_str(),
                ],
            )?
            .into_iter()
            .next()
        else {
            return Ok(self.skip(SkipReason::RecordNotFound, None));
        };

        for field in fields.precursors() {
            if record.get(field).is_none() {
                let reason = SkipReason::MissingPrecursor {
                    field: field.to_owned(),
                };
                return Ok(self.skip(reason, Some(&record)));
            }
        }

        if let Some(existing) = assigned_identifier(&record, &fields.identifier) {
            return Ok(self.skip(SkipReason::AlreadyAssigned { existing }, None));
        }

        // Both precursors were checked above.
        let key = record.get(&fields.partition_key).unwrap_or_default();
        if key.contains(SEPARATOR) {
            let reason = SkipReason::InvalidPartitionKey {
                key: key.to_owned(),
            };
            return Ok(self.skip(reason, Some(&record)));
        }
        let flag = record.get(&fields.variant_flag).unwrap_or_default();
        let variant = Variant::from_flag(flag, &self.config.non_primary_value);
        let partition = Partition::new(key, variant);

        self.locks
            .with_lock(&partition, || self.allocate_in(&event.record_id, &partition))?
    }

    /// Scan, compute and write. Must run under the partition's lock.
    fn allocate_in(&self, record_id: &str, partition: &Partition) -> Result<Allocation> {
        let fields = &self.config.fields;
        let rid_field = self.store.record_id_field();

        // Another event for the same record may have won the race for the lock.
        let current = self
            .store
            .fetch_fields(
                RecordFilter::One(record_id),
                &[rid_field, fields.identifier.as_str()],
            )?;
        if let Some(existing) = current
            .first()
            .and_then(|r| assigned_identifier(r, &fields.identifier))
        {
            return Ok(self.skip(SkipReason::AlreadyAssigned { existing }, None));
        }

        let records = self.store.fetch_fields(
            RecordFilter::All,
            &[
                rid_field,
                fields.partition_key.as_str(),
                fields.identifier.as_str(),
            ],
        )?;
        let highest = highest_sequence(
            records.iter().filter_map(|r| r.get(&fields.identifier)),
            partition,
        );

        let sequence = highest.saturating_add(1);
        let id = ParticipantId::new(partition.key.as_str(), sequence, partition.variant).map_err(
            |_| {
                #[cfg(feature = "tracing")]
                tracing::warn!(%partition, sequence, "sequence exhausted");
                Error::SequenceOverflow {
                    partition_key: partition.key.clone(),
                    variant: partition.variant,
                    sequence,
                }
            },
        )?;

        #[cfg(feature = "tracing")]
        tracing::debug!(%partition, highest, %id, "computed next identifier");

        let update = RecordUpdate::new(record_id).set(&fields.identifier, id.to_string());
        match self.store.save_fields(&update) {
            Ok(()) => {
                self.emit(&format!(
                    "Generated participant ID ([{}]) value of {id} for record with {rid_field} {record_id}",
                    fields.identifier
                ));
                Ok(Allocation::Assigned { id })
            }
            Err(errors) => {
                let details = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                self.emit(&format!(
                    "Encountered errors trying to save generated participant ID {id} for record with {rid_field} {record_id}: {details}"
                ));
                Ok(Allocation::SaveFailed { id, errors })
            }
        }
    }

    fn skip(&self, reason: SkipReason, record: Option<&Record>) -> Allocation {
        #[cfg(feature = "tracing")]
        tracing::trace!(%reason, "allocation skipped");

        if self.config.verbose {
            let mut message = format!("Didn't generate participant ID upon save record ({reason})");
            if let Some(record) = record {
                let dump = record
                    .fields()
                    .map(|(name, value)| format!("{name}={}", value.unwrap_or("<null>")))
                    .collect::<Vec<_>>()
                    .join(", ");
                message.push_str(&format!(". Record data (for debugging): {dump}"));
            }
            self.emit(&message);
        }
        Allocation::Skipped { reason }
    }

    fn emit(&self, message: &str) {
        self.log.log_event(&self.config.log_source, message);
    }
}

/// Highest sequence number among `identifiers` that belong to `partition`, or
/// `0` if none do.
///
/// Identifiers are read with [`ScannedId::scan`]: values without a sequence
/// segment are skipped and non-numeric sequences count as `0`.
pub fn highest_sequence<'a>(
    identifiers: impl IntoIterator<Item = &'a str>,
    partition: &Partition,
) -> u32 {
    identifiers
        .into_iter()
        .filter_map(ScannedId::scan)
        .filter(|id| id.is_in(&partition.key, partition.variant))
        .map(|id| id.sequence)
        .max()
        .unwrap_or(0)
}

fn assigned_identifier(record: &Record, field: &str) -> Option<String> {
    if record.is_filled(field) {
        record.get(field).map(str::to_owned)
    } else {
        None
    }
}
