//! The per-datagram walker.
//!
//! [`Walker::walk_buffer`] drives one datagram through a fixed pipeline:
//!
//! ```text
//! message header ──> header filter ──> per-set loop
//!                                        │
//!                 template set ──> cache │  options template ──> skipped
//!                                        │
//!                 data set ──> per-record field loop ──> callback
//! ```
//!
//! Control only ever leaves through the callback. Each invocation carries
//! the shared [`Record`] context, the field identity, and the value bytes as
//! a borrow of the input buffer; returning an error from the callback aborts
//! the walk at that exact point.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, trace};

use flowwalk_proto::{
    Cursor, FieldSpecifier, MessageHeader, SetHeader, SetKind, Truncated, IPFIX_VERSION,
    NETFLOW_V9_VERSION, SET_HEADER_LEN,
};

use crate::filter::Filter;
use crate::templates::TemplateCache;

/// Error type a callback may return to abort the walk.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`Walker::walk_buffer`].
///
/// Framing errors halt the walk where they are detected; callbacks already
/// delivered stay delivered.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The message header names a version that is neither 9 nor 10.
    #[error("unsupported message version {0}")]
    UnsupportedVersion(u16),

    /// A set id that is reserved, or that belongs to the other protocol
    /// version. The set body has no known framing, so the walk cannot
    /// continue past it.
    #[error("illegal set id {set_id} for version {version}")]
    IllegalSet {
        /// Version the datagram declared.
        version: u16,
        /// Offending set id.
        set_id: u16,
    },

    /// A data set references a template this datagram never declared.
    ///
    /// Fatal for the remainder of the datagram: without the template the
    /// set's records cannot be delimited.
    #[error("data set references unknown template {0}")]
    UnknownTemplate(u16),

    /// A header, template or field ran past the end of the datagram.
    #[error(transparent)]
    Truncated(#[from] Truncated),

    /// The callback returned an error; it is carried here unchanged.
    #[error("callback aborted the walk")]
    Callback(#[source] CallbackError),
}

/// Callback context: message header plus walk position.
///
/// One `Record` lives per [`Walker::walk_buffer`] call. It is mutated in
/// place as the walk advances and handed to the callback by reference, so
/// its fields describe the position of the value currently being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Record {
    /// Header of the datagram being walked.
    pub header: MessageHeader,
    /// 0-based index of the current set within the datagram. Increases
    /// monotonically over the walk.
    pub set_index: usize,
    /// 0-based index of the current data record within its set. Resets at
    /// every set boundary.
    pub record_index: usize,
    /// True only on the terminal callback that closes a data record (and on
    /// the single callback of a header-only walk). The value is empty and
    /// the field identity is (0, 0) on such callbacks.
    pub end_of_record: bool,
}

/// Walker sizing knobs.
///
/// Both capacities are hints: templates that overflow the specifier arena
/// still decode, through a per-template allocation.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Templates the cache can hold before it reallocates.
    pub template_capacity: usize,
    /// Field specifiers the shared arena can pool.
    pub field_capacity: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self { template_capacity: 32, field_capacity: 1024 }
    }
}

/// Streaming decoder for one datagram at a time.
///
/// A walker owns its scratch arenas and is therefore single-threaded; spawn
/// one walker per worker and share the [`Filter`] between them. The callback
/// is supplied per [`walk_buffer`](Walker::walk_buffer) call, not at
/// construction, so one walker can serve different consumers serially.
#[derive(Debug)]
pub struct Walker {
    filter: Option<Arc<Filter>>,
    header_only: bool,
    cache: TemplateCache,
}

impl Walker {
    /// Create a walker. With `filter` absent every header and every field
    /// identity passes.
    #[must_use]
    pub fn new(filter: Option<Arc<Filter>>, config: WalkerConfig) -> Self {
        Self {
            filter,
            header_only: false,
            cache: TemplateCache::with_capacity(config.template_capacity, config.field_capacity),
        }
    }

    /// In header-only mode a walk emits exactly one end-of-record callback
    /// carrying the decoded message header, and never touches the sets.
    pub fn set_header_only(&mut self, header_only: bool) {
        self.header_only = header_only;
    }

    /// Walk one datagram, invoking `cb` for every surviving field value.
    ///
    /// The callback receives the [`Record`] context, the enterprise id, the
    /// field id, and the value as a sub-slice of `datagram` (the `'buf`
    /// lifetime lets callers stash value slices for the duration of the
    /// buffer). After each data record that emitted at least one field, a
    /// terminal callback with `end_of_record` set, identity (0, 0) and an
    /// empty value marks the record boundary.
    ///
    /// A datagram rejected by the filter's header predicate is not an
    /// error; the walk simply emits nothing.
    ///
    /// # Errors
    ///
    /// See [`WalkError`]. Framing errors abort the walk at the point of
    /// detection; an error returned by `cb` aborts it at the current field
    /// and comes back as [`WalkError::Callback`].
    pub fn walk_buffer<'buf, F>(&mut self, datagram: &'buf [u8], mut cb: F) -> Result<(), WalkError>
    where
        F: FnMut(&Record, u32, u16, &'buf [u8]) -> Result<(), CallbackError>,
    {
        let mut cur = Cursor::new(datagram);
        let mut record = Record { header: MessageHeader::read(&mut cur), ..Record::default() };

        if let Some(filter) = &self.filter {
            if filter.filter_header(record.header.domain_id, record.header.version) {
                trace!(
                    version = record.header.version,
                    domain_id = record.header.domain_id,
                    "datagram rejected by header filter"
                );
                return Ok(());
            }
        }

        if self.header_only {
            record.end_of_record = true;
            return cb(&record, 0, 0, &[]).map_err(WalkError::Callback);
        }

        match record.header.version {
            IPFIX_VERSION | NETFLOW_V9_VERSION => self.walk_sets(&mut cur, &mut record, &mut cb),
            version => Err(WalkError::UnsupportedVersion(version)),
        }
    }

    /// Per-set loop, shared by both versions; the version only decides how
    /// set ids are classified.
    fn walk_sets<'buf, F>(
        &mut self,
        cur: &mut Cursor<'buf>,
        record: &mut Record,
        cb: &mut F,
    ) -> Result<(), WalkError>
    where
        F: FnMut(&Record, u32, u16, &'buf [u8]) -> Result<(), CallbackError>,
    {
        self.cache.reset();
        let version = record.header.version;

        loop {
            if cur.is_empty() {
                break;
            }
            if cur.remaining() < SET_HEADER_LEN {
                return Err(Truncated.into());
            }

            let set_header = SetHeader::read(cur);
            let Some(body_len) = set_header.body_len() else {
                // advertised length cannot even cover the set header
                return Err(Truncated.into());
            };
            let mut body = Cursor::new(cur.take(body_len));
            cur.check()?;

            record.record_index = 0;
            match SetKind::classify(version, set_header.set_id) {
                SetKind::Template => self.read_templates(&mut body)?,
                SetKind::OptionsTemplate => {
                    trace!(set_id = set_header.set_id, "options template set skipped");
                }
                SetKind::Data => {
                    self.walk_data_set(&mut body, set_header.set_id, record, cb)?;
                }
                SetKind::Illegal => {
                    debug!(version, set_id = set_header.set_id, "illegal set id, walk aborted");
                    return Err(WalkError::IllegalSet { version, set_id: set_header.set_id });
                }
            }
            record.set_index += 1;
        }

        Ok(())
    }

    fn read_templates(&mut self, body: &mut Cursor<'_>) -> Result<(), WalkError> {
        while !body.is_empty() {
            self.cache.read_template(body)?;
        }
        Ok(())
    }

    /// Decode the records of one data set against its template and emit the
    /// surviving fields.
    fn walk_data_set<'buf, F>(
        &self,
        body: &mut Cursor<'buf>,
        set_id: u16,
        record: &mut Record,
        cb: &mut F,
    ) -> Result<(), WalkError>
    where
        F: FnMut(&Record, u32, u16, &'buf [u8]) -> Result<(), CallbackError>,
    {
        let Some(template) = self.cache.lookup(set_id) else {
            return Err(WalkError::UnknownTemplate(set_id));
        };

        let min_record_len: usize = template.iter().map(FieldSpecifier::min_encoded_len).sum();
        if min_record_len == 0 {
            // A template of only zero-length fields matches nothing a record
            // loop could consume; skip the body rather than spin on it.
            debug!(set_id, "template has zero minimum record length, set skipped");
            return Ok(());
        }

        // Anything shorter than one more record is padding.
        while body.remaining() >= min_record_len {
            let mut emitted = false;
            for spec in template {
                let len = if spec.is_variable_length() {
                    match body.u8() {
                        0xff => body.u16() as usize,
                        short => short as usize,
                    }
                } else {
                    spec.length as usize
                };
                let value = body.take(len);
                body.check()?;

                if let Some(filter) = &self.filter {
                    if !filter.is_set(spec.enterprise_id, spec.field_id) {
                        continue;
                    }
                }
                cb(record, spec.enterprise_id, spec.field_id, value)
                    .map_err(WalkError::Callback)?;
                emitted = true;
            }

            // Closing marker only when something was emitted, so consumers
            // can tell an all-filtered record from a record boundary.
            if emitted {
                record.end_of_record = true;
                let result = cb(record, 0, 0, &[]);
                record.end_of_record = false;
                result.map_err(WalkError::Callback)?;
            }
            record.record_index += 1;
        }

        Ok(())
    }
}
