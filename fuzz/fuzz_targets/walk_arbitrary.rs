//! Negative-space fuzzer for the datagram walker.
//!
//! Feeds arbitrary bytes through a plain walker, a filtered walker and a
//! header-only walker. The walker's contract on garbage is "an error value
//! or a clean stop, never a panic"; value slices must additionally stay
//! inside the input buffer.

#![no_main]

use std::sync::Arc;

use flowwalk_core::{Filter, Walker, WalkerConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let range = data.as_ptr_range();
    let check_bounds = |value: &[u8]| {
        if !value.is_empty() {
            let value_range = value.as_ptr_range();
            assert!(value_range.start >= range.start && value_range.end <= range.end);
        }
    };

    let mut walker = Walker::new(None, WalkerConfig::default());
    let _ = walker.walk_buffer(data, |_, _, _, value| {
        check_bounds(value);
        Ok(())
    });

    let mut filter = Filter::new();
    filter.set(0, 8);
    filter.set(0, 12);
    filter.set(29305, 1);
    let mut walker = Walker::new(Some(Arc::new(filter)), WalkerConfig::default());
    let _ = walker.walk_buffer(data, |_, _, _, value| {
        check_bounds(value);
        Ok(())
    });

    walker.set_header_only(true);
    let _ = walker.walk_buffer(data, |_, _, _, _| Ok(()));
});
