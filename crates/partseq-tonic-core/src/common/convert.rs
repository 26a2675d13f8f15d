//! Conversions between protocol messages and `partseq` types.

use crate::proto;
use partseq::{Allocation, FieldError, SaveEvent, SkipReason};

impl From<proto::SaveEvent> for SaveEvent {
    fn from(event: proto::SaveEvent) -> Self {
        Self::new(event.record_id, event.project_id)
    }
}

impl From<FieldError> for proto::FieldError {
    fn from(err: FieldError) -> Self {
        Self {
            record_id: err.record_id,
            field: err.field,
            message: err.message,
        }
    }
}

impl From<&SkipReason> for proto::SkipReason {
    fn from(reason: &SkipReason) -> Self {
        match reason {
            SkipReason::EmptyEvent => Self::EmptyEvent,
            SkipReason::RecordNotFound => Self::RecordNotFound,
            SkipReason::MissingPrecursor { .. } => Self::MissingPrecursor,
            SkipReason::AlreadyAssigned { .. } => Self::AlreadyAssigned,
            SkipReason::InvalidPartitionKey { .. } => Self::InvalidPartitionKey,
            _ => Self::Unspecified,
        }
    }
}

impl From<Allocation> for proto::AllocationReply {
    fn from(allocation: Allocation) -> Self {
        match allocation {
            Allocation::Assigned { id } => Self {
                outcome: proto::Outcome::Assigned.into(),
                participant_id: id.into_string(),
                ..Default::default()
            },
            Allocation::Skipped { reason } => {
                let participant_id = match &reason {
                    SkipReason::AlreadyAssigned { existing } => existing.clone(),
                    _ => String::new(),
                };
                Self {
                    outcome: proto::Outcome::Skipped.into(),
                    participant_id,
                    skip_reason: proto::SkipReason::from(&reason).into(),
                    detail: reason.to_string(),
                    errors: Vec::new(),
                }
            }
            Allocation::SaveFailed { id, errors } => Self {
                outcome: proto::Outcome::SaveFailed.into(),
                participant_id: id.into_string(),
                detail: format!("{} field error(s)", errors.len()),
                errors: errors.into_iter().map(Into::into).collect(),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partseq::{ParticipantId, Variant};

    #[test]
    fn assigned_reply() {
        let id = ParticipantId::new("1234", 2, Variant::NonPrimary).unwrap();
        let reply = proto::AllocationReply::from(Allocation::Assigned { id });
        assert_eq!(reply.outcome(), proto::Outcome::Assigned);
        assert_eq!(reply.participant_id, "1234-002-NC");
        assert!(reply.errors.is_empty());
    }

    #[test]
    fn already_assigned_reply_carries_existing_id() {
        let reply = proto::AllocationReply::from(Allocation::Skipped {
            reason: SkipReason::AlreadyAssigned {
                existing: "1234-001".into(),
            },
        });
        assert_eq!(reply.outcome(), proto::Outcome::Skipped);
        assert_eq!(reply.skip_reason(), proto::SkipReason::AlreadyAssigned);
        assert_eq!(reply.participant_id, "1234-001");
    }

    #[test]
    fn missing_precursor_reply_names_the_field() {
        let reply = proto::AllocationReply::from(Allocation::Skipped {
            reason: SkipReason::MissingPrecursor {
                field: "test".into(),
            },
        });
        assert_eq!(reply.skip_reason(), proto::SkipReason::MissingPrecursor);
        assert!(reply.participant_id.is_empty());
        assert_eq!(reply.detail, "empty test variable");
    }

    #[test]
    fn invalid_partition_key_reply() {
        let reply = proto::AllocationReply::from(Allocation::Skipped {
            reason: SkipReason::InvalidPartitionKey { key: "AB-1".into() },
        });
        assert_eq!(reply.skip_reason(), proto::SkipReason::InvalidPartitionKey);
        assert!(reply.participant_id.is_empty());
    }

    #[test]
    fn save_failed_reply_lists_errors() {
        let id = ParticipantId::new("1234", 1, Variant::Primary).unwrap();
        let reply = proto::AllocationReply::from(Allocation::SaveFailed {
            id,
            errors: vec![FieldError::new("7", "unique_id_2", "locked")],
        });
        assert_eq!(reply.outcome(), proto::Outcome::SaveFailed);
        assert_eq!(reply.participant_id, "1234-001");
        assert_eq!(
            reply.errors,
            vec![proto::FieldError {
                record_id: "7".into(),
                field: "unique_id_2".into(),
                message: "locked".into(),
            }]
        );
    }
}
