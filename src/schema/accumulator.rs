//! Incremental schema inference over a record sequence

use super::types::{ConflictPolicy, FieldType, InferredSchema, SchemaDescriptor};
use crate::digest::key_fingerprint;
use crate::error::{Error, Result};
use crate::record::Record;
use tracing::{debug, trace};

/// Fold one record into `descriptor`.
///
/// Optionality is only reconciled when the record's key set differs from the
/// previously reconciled one. Types of already-known fields are checked on
/// every record and resolved with `policy`.
pub fn observe(
    mut descriptor: SchemaDescriptor,
    record: &Record,
    policy: ConflictPolicy,
) -> Result<SchemaDescriptor> {
    observe_in_place(&mut descriptor, record, policy)?;
    Ok(descriptor)
}

/// In-place form of [`observe`]. On error the descriptor is unchanged.
fn observe_in_place(
    descriptor: &mut SchemaDescriptor,
    record: &Record,
    policy: ConflictPolicy,
) -> Result<()> {
    reconcile_types(descriptor, record, policy)?;

    let signature = key_fingerprint(record.keys());
    if descriptor.signature.as_deref() == Some(signature.as_str()) {
        trace!(%signature, "Key set unchanged, skipping reconciliation");
        return Ok(());
    }

    let first_record = descriptor.is_empty();

    // Known fields missing from this record become optional
    for (name, field_type) in &mut descriptor.field_types {
        if !record.contains_key(name) && !descriptor.optional_fields.contains(name) {
            debug!(field = %name, "Field missing from record, marking optional");
            field_type.make_optional();
            descriptor.optional_fields.insert(name.clone());
        }
    }

    for (name, value) in record.iter() {
        if descriptor.optional_fields.contains(name) {
            continue;
        }
        if first_record {
            descriptor
                .field_types
                .insert(name.to_string(), FieldType::for_value(value));
        } else if !descriptor.field_types.contains_key(name) {
            debug!(field = %name, "New field after first record, marking optional");
            let mut field_type = FieldType::for_value(value);
            field_type.make_optional();
            descriptor.field_types.insert(name.to_string(), field_type);
            descriptor.optional_fields.insert(name.to_string());
        }
    }

    descriptor.signature = Some(signature);
    Ok(())
}

/// Apply `policy` to every known field whose observed type is not recorded.
///
/// Conflicts are collected before anything is mutated, so an error leaves the
/// descriptor untouched.
fn reconcile_types(
    descriptor: &mut SchemaDescriptor,
    record: &Record,
    policy: ConflictPolicy,
) -> Result<()> {
    let mut updates = Vec::new();

    for (name, value) in record.iter() {
        let Some(existing) = descriptor.field_types.get(name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let observed = value.type_tag();
        // A field only ever seen as null takes the first concrete type
        if existing.is_null_only() {
            updates.push((name, observed, ConflictPolicy::Overwrite));
            continue;
        }
        if existing.contains(observed) {
            continue;
        }
        if policy == ConflictPolicy::Error {
            return Err(Error::TypeConflict {
                field: name.to_string(),
                existing: existing.to_string(),
                observed: observed.to_string(),
            });
        }
        updates.push((name, observed, policy));
    }

    for (name, observed, policy) in updates {
        if let Some(field_type) = descriptor.field_types.get_mut(name) {
            debug!(field = %name, from = %field_type, to = %observed, ?policy, "Type changed");
            match policy {
                ConflictPolicy::WidenToUnion => field_type.widen(observed),
                ConflictPolicy::Overwrite | ConflictPolicy::Error => field_type.replace(observed),
            }
        }
    }

    Ok(())
}

/// Owner of a [`SchemaDescriptor`] that records are folded into one at a time
#[derive(Debug, Clone, Default)]
pub struct SchemaAccumulator {
    descriptor: SchemaDescriptor,
    policy: ConflictPolicy,
    records_observed: usize,
}

impl SchemaAccumulator {
    /// Create an accumulator with the default conflict policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with the given conflict policy
    pub fn with_policy(policy: ConflictPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Conflict policy in use
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Current descriptor
    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    /// Number of records folded so far
    pub fn records_observed(&self) -> usize {
        self.records_observed
    }

    /// Fold one record into the running schema
    pub fn observe(&mut self, record: &Record) -> Result<()> {
        observe_in_place(&mut self.descriptor, record, self.policy)?;
        self.records_observed += 1;
        Ok(())
    }

    /// Fold every record in order
    pub fn observe_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.observe(record)?;
        }
        Ok(())
    }

    /// Finish and produce the persisted schema
    pub fn finalize(self) -> InferredSchema {
        self.descriptor.finalize()
    }
}

/// Infer a schema from a complete record sequence
pub fn infer_schema<'a, I>(records: I, policy: ConflictPolicy) -> Result<InferredSchema>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut accumulator = SchemaAccumulator::with_policy(policy);
    accumulator.observe_all(records)?;
    Ok(accumulator.finalize())
}
