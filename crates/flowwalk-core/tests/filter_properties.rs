//! Property tests for the filter's membership semantics and for walker
//! robustness on arbitrary input.
//!
//! The filter's contract has a deliberate asymmetry (a namespace nobody
//! registered in passes everything), which is exactly the kind of rule a
//! hand-picked example can get wrong two ways at once. These tests pin it
//! against generated ids and enterprises.

use std::sync::Arc;

use flowwalk_core::{FieldBitmap, Filter, Walker, WalkerConfig};
use proptest::prelude::*;

proptest! {
    #[test]
    fn bitmap_round_trip(id in any::<u16>(), probe in any::<u16>()) {
        let mut bm = FieldBitmap::new();
        bm.set(id);
        prop_assert!(bm.test(id));
        prop_assert_eq!(bm.test(probe), probe == id);

        bm.clear(id);
        prop_assert!(!bm.test(id));
        prop_assert!(!bm.test(probe));
    }

    #[test]
    fn fresh_filter_passes_every_identity(
        enterprise_id in any::<u32>(),
        field_id in any::<u16>(),
        domain_id in any::<u32>(),
        version in any::<u16>(),
    ) {
        let f = Filter::new();
        prop_assert!(f.is_set(enterprise_id, field_id));
        prop_assert!(!f.filter_header(domain_id, version));
    }

    #[test]
    fn base_registration_restricts_only_enterprise_zero(
        registered in any::<u16>(),
        probe in any::<u16>(),
        other_enterprise in 1u32..,
    ) {
        let mut f = Filter::new();
        f.set(0, registered);
        prop_assert_eq!(f.is_set(0, probe), probe == registered);
        prop_assert!(f.is_set(other_enterprise, probe));
    }

    #[test]
    fn enterprise_registration_restricts_only_itself(
        enterprise_id in 1u32..,
        registered in any::<u16>(),
        probe in any::<u16>(),
        other_enterprise in 1u32..,
    ) {
        let mut f = Filter::new();
        f.set(enterprise_id, registered);
        prop_assert_eq!(f.is_set(enterprise_id, probe), probe == registered);
        prop_assert!(f.is_set(0, probe));
        if other_enterprise != enterprise_id {
            prop_assert!(f.is_set(other_enterprise, probe));
        }
    }

    // Cross-check the filter against a plain bitmap per enterprise, the way
    // a reference implementation would hold them.
    #[test]
    fn filter_matches_per_enterprise_bitmaps(
        registrations in prop::collection::vec((0u32..4, any::<u16>()), 0..64),
        probes in prop::collection::vec((0u32..5, any::<u16>()), 0..64),
    ) {
        let mut f = Filter::new();
        let mut model: Vec<(u32, FieldBitmap)> = Vec::new();
        for &(enterprise_id, field_id) in &registrations {
            f.set(enterprise_id, field_id);
            if let Some((_, bm)) = model.iter_mut().find(|(e, _)| *e == enterprise_id) {
                bm.set(field_id);
            } else {
                let mut bm = FieldBitmap::new();
                bm.set(field_id);
                model.push((enterprise_id, bm));
            }
        }
        for &(enterprise_id, field_id) in &probes {
            let expected = match model.iter().find(|(e, _)| *e == enterprise_id) {
                Some((_, bm)) => bm.test(field_id),
                None => true,
            };
            prop_assert_eq!(f.is_set(enterprise_id, field_id), expected);
        }
    }

    // Arbitrary byte soup must never panic the walker, and walking it twice
    // must emit the same sequence both times.
    #[test]
    fn walker_survives_arbitrary_input(buf in prop::collection::vec(any::<u8>(), 0..2048)) {
        let mut walker = Walker::new(None, WalkerConfig::default());
        let mut first = Vec::new();
        let outcome = walker.walk_buffer(&buf, |record, enterprise_id, field_id, value| {
            first.push((enterprise_id, field_id, value.to_vec(), record.end_of_record));
            Ok(())
        });
        let first_err = outcome.err().map(|e| e.to_string());

        let mut second = Vec::new();
        let outcome = walker.walk_buffer(&buf, |record, enterprise_id, field_id, value| {
            second.push((enterprise_id, field_id, value.to_vec(), record.end_of_record));
            Ok(())
        });
        prop_assert_eq!(first, second);
        prop_assert_eq!(first_err, outcome.err().map(|e| e.to_string()));
    }

    #[test]
    fn filtered_walker_survives_arbitrary_input(buf in prop::collection::vec(any::<u8>(), 0..2048)) {
        let mut filter = Filter::new();
        filter.set_version(10);
        filter.set(0, 8);
        filter.set(29305, 12);
        let mut walker = Walker::new(Some(Arc::new(filter)), WalkerConfig::default());
        let _ = walker.walk_buffer(&buf, |_, _, _, _| Ok(()));
    }
}
