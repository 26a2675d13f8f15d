/// Default name of the partition-key (site code) field.
pub const DEFAULT_PARTITION_FIELD: &str = "test";

/// Default name of the variant-flag (consent status) field.
pub const DEFAULT_VARIANT_FIELD: &str = "patient_status_2";

/// Default name of the field the identifier is written to.
pub const DEFAULT_IDENTIFIER_FIELD: &str = "unique_id_2";

/// Default variant-flag value that marks a record as non-primary.
pub const DEFAULT_NON_PRIMARY_VALUE: &str = "3";

/// Default `source` attached to every audit log event.
pub const DEFAULT_LOG_SOURCE: &str = "Participant ID Allocator";

/// Names of the record fields the allocator reads and writes.
///
/// The record-id field is owned by the store, see
/// [`RecordStore::record_id_field`].
///
/// [`RecordStore::record_id_field`]: crate::RecordStore::record_id_field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldNames {
    pub partition_key: String,
    pub variant_flag: String,
    pub identifier: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            partition_key: DEFAULT_PARTITION_FIELD.into(),
            variant_flag: DEFAULT_VARIANT_FIELD.into(),
            identifier: DEFAULT_IDENTIFIER_FIELD.into(),
        }
    }
}

impl FieldNames {
    /// The fields that must be present before an allocation may proceed.
    pub fn precursors(&self) -> [&str; 2] {
        [&self.partition_key, &self.variant_flag]
    }
}

/// Configuration of an [`Allocator`].
///
/// `verbose` only controls whether no-op outcomes are written to the audit
/// log. It never changes what gets allocated.
///
/// [`Allocator`]: crate::Allocator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub fields: FieldNames,
    pub non_primary_value: String,
    pub log_source: String,
    pub verbose: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            fields: FieldNames::default(),
            non_primary_value: DEFAULT_NON_PRIMARY_VALUE.into(),
            log_source: DEFAULT_LOG_SOURCE.into(),
            verbose: false,
        }
    }
}

impl AllocatorConfig {
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FieldNames) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_non_primary_value(mut self, value: impl Into<String>) -> Self {
        self.non_primary_value = value.into();
        self
    }

    #[must_use]
    pub fn with_log_source(mut self, source: impl Into<String>) -> Self {
        self.log_source = source.into();
        self
    }
}
