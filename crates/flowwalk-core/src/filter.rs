//! Field-identity and message-header filtering.
//!
//! A [`Filter`] answers two questions for the walker: "should this whole
//! datagram be dropped?" ([`Filter::filter_header`]) and "does the caller
//! want this (enterprise, field) pair?" ([`Filter::is_set`]).
//!
//! # Absence Means Allow
//!
//! Membership testing is deliberately asymmetric. A namespace nobody ever
//! registered an id in is not filtered at all:
//!
//! - enterprise 0 (IANA): until the first `set(0, ..)` call, every IANA
//!   field passes. After that, only the registered bits pass, even if they
//!   are later all cleared again.
//! - enterprise != 0: if no entry exists for that enterprise, every field of
//!   it passes; once an entry exists, only its registered bits pass.
//!
//! This lets a single predicate serve both a filter that restricts a few
//! namespaces and the "no filter at all" walker configuration, without a
//! special case in the per-field hot loop.

use crate::bitmap::FieldBitmap;

/// Optional predicates over the message header.
///
/// Each predicate is enabled by giving it a value; enabled predicates AND
/// together.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderFilter {
    /// Accept only this protocol version, when set.
    pub version: Option<u16>,
    /// Accept only this observation domain / source id, when set.
    pub domain_id: Option<u32>,
}

/// Per-enterprise bitmap for one non-zero enterprise id.
#[derive(Debug, Clone)]
struct EnterpriseFilter {
    enterprise_id: u32,
    bitmap: FieldBitmap,
}

/// Decides which datagrams and which field identities the walker reports.
///
/// Built by the caller before walking, read-only during walks. A filter is
/// plain data; wrap it in an `Arc` to share one instance across walkers.
///
/// None of the registration or lookup operations can fail.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    header: HeaderFilter,
    base: FieldBitmap,
    /// Whether `set(0, ..)` was ever called. Distinguishes "no IANA filter,
    /// pass everything" from "IANA filter registered but currently empty".
    base_registered: bool,
    others: Vec<EnterpriseFilter>,
}

impl Filter {
    /// Create a filter that passes every header and every field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the version predicate.
    pub fn set_version(&mut self, version: u16) {
        self.header.version = Some(version);
    }

    /// Disable the version predicate.
    pub fn clear_version(&mut self) {
        self.header.version = None;
    }

    /// Enable the observation-domain predicate.
    pub fn set_domain_id(&mut self, domain_id: u32) {
        self.header.domain_id = Some(domain_id);
    }

    /// Disable the observation-domain predicate.
    pub fn clear_domain_id(&mut self) {
        self.header.domain_id = None;
    }

    /// Header predicate: true means the datagram should be **rejected**.
    ///
    /// With no predicates enabled this never rejects.
    #[must_use]
    pub fn filter_header(&self, domain_id: u32, version: u16) -> bool {
        if let Some(want) = self.header.domain_id {
            if want != domain_id {
                return true;
            }
        }
        if let Some(want) = self.header.version {
            if want != version {
                return true;
            }
        }
        false
    }

    /// Register interest in `(enterprise_id, field_id)`.
    pub fn set(&mut self, enterprise_id: u32, field_id: u16) {
        if enterprise_id == 0 {
            self.base.set(field_id);
            self.base_registered = true;
            return;
        }
        if let Some(entry) = self.lookup_mut(enterprise_id) {
            entry.bitmap.set(field_id);
            return;
        }
        let mut entry = EnterpriseFilter { enterprise_id, bitmap: FieldBitmap::new() };
        entry.bitmap.set(field_id);
        self.others.push(entry);
    }

    /// Drop interest in `(enterprise_id, field_id)`.
    ///
    /// Clearing never un-registers a namespace: once enterprise 0 has seen a
    /// `set`, an empty base bitmap rejects every IANA field rather than
    /// passing them all.
    pub fn clear(&mut self, enterprise_id: u32, field_id: u16) {
        if enterprise_id == 0 {
            self.base.clear(field_id);
            return;
        }
        if let Some(entry) = self.lookup_mut(enterprise_id) {
            entry.bitmap.clear(field_id);
        }
    }

    /// Membership test with the absence-means-allow asymmetry described in
    /// the module docs.
    #[must_use]
    pub fn is_set(&self, enterprise_id: u32, field_id: u16) -> bool {
        if enterprise_id == 0 {
            if !self.base_registered {
                return true;
            }
            return self.base.test(field_id);
        }
        match self.others.iter().find(|e| e.enterprise_id == enterprise_id) {
            Some(entry) => entry.bitmap.test(field_id),
            // no filter registered for this enterprise
            None => true,
        }
    }

    // Linear scan: the registered-enterprise count is expected to stay in
    // the single digits, where a scan beats any hashing.
    fn lookup_mut(&mut self, enterprise_id: u32) -> Option<&mut EnterpriseFilter> {
        self.others.iter_mut().find(|e| e.enterprise_id == enterprise_id)
    }
}
