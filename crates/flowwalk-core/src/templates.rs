//! Per-packet template cache.
//!
//! Data records are not self-describing; decoding a data set requires the
//! template the same datagram declared for its set id. The cache keeps those
//! templates for exactly one walk and is reset (length only, capacity kept)
//! when the next walk starts, so nothing leaks between packets and the hot
//! path stays allocation-free once the arenas have warmed up.
//!
//! # Arena Invariant
//!
//! Each template owns a run of consecutive [`FieldSpecifier`] slots. Runs
//! are carved from the tail of a shared arena that never grows past its
//! reserved capacity; a template that does not fit gets its own freshly
//! allocated vector instead. Either way a run, once handed out, never moves
//! for the rest of the packet.

use std::ops::Range;

use tracing::trace;

use flowwalk_proto::{Cursor, FieldSpecifier, Result, TemplateHeader};

/// Where one template's field run lives.
#[derive(Debug)]
enum FieldRun {
    /// Range into the shared specifier arena.
    Pooled(Range<usize>),
    /// Overflow allocation taken when the arena was full.
    Owned(Vec<FieldSpecifier>),
}

#[derive(Debug)]
struct TemplateRecord {
    template_id: u16,
    fields: FieldRun,
}

/// Template cache scoped to a single datagram.
///
/// Append-only between resets. A template id declared twice in one packet
/// resolves to its first declaration on lookup.
#[derive(Debug)]
pub struct TemplateCache {
    templates: Vec<TemplateRecord>,
    arena: Vec<FieldSpecifier>,
}

impl TemplateCache {
    /// Create a cache with room for `template_capacity` templates and
    /// `field_capacity` pooled field specifiers.
    #[must_use]
    pub fn with_capacity(template_capacity: usize, field_capacity: usize) -> Self {
        Self {
            templates: Vec::with_capacity(template_capacity),
            arena: Vec::with_capacity(field_capacity),
        }
    }

    /// Forget every template. Capacity is retained.
    pub fn reset(&mut self) {
        self.templates.clear();
        self.arena.clear();
    }

    /// Parse one template record off the cursor and append it.
    ///
    /// # Errors
    ///
    /// Returns [`Truncated`](flowwalk_proto::Truncated) when the record runs
    /// past the end of the set body.
    pub fn read_template(&mut self, cur: &mut Cursor<'_>) -> Result<()> {
        let header = TemplateHeader::read(cur);
        cur.check()?;

        let count = header.field_count as usize;
        let fields = if self.arena.len() + count <= self.arena.capacity() {
            let start = self.arena.len();
            for _ in 0..count {
                let spec = FieldSpecifier::read(cur);
                cur.check()?;
                self.arena.push(spec);
            }
            FieldRun::Pooled(start..self.arena.len())
        } else {
            // Growing the arena would be fine for indices but defeats its
            // purpose; overflow templates pay for their own allocation.
            let mut owned = Vec::with_capacity(count);
            for _ in 0..count {
                let spec = FieldSpecifier::read(cur);
                cur.check()?;
                owned.push(spec);
            }
            FieldRun::Owned(owned)
        };

        trace!(template_id = header.template_id, field_count = count, "template registered");
        self.templates.push(TemplateRecord { template_id: header.template_id, fields });
        Ok(())
    }

    /// Fields of the first template declared under `template_id`, in
    /// declaration order.
    #[must_use]
    pub fn lookup(&self, template_id: u16) -> Option<&[FieldSpecifier]> {
        self.templates.iter().find(|t| t.template_id == template_id).map(|t| match &t.fields {
            FieldRun::Pooled(range) => &self.arena[range.clone()],
            FieldRun::Owned(fields) => fields.as_slice(),
        })
    }
}
