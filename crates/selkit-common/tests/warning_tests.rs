//! Tests for the deduplicating warning reporter.

use selkit_common::warning::{clear_warnings, has_warned, warn_once};

// The warning set is process-global, so everything that clears it lives in
// one test to avoid races between test threads.
#[test]
fn test_warn_once_records_and_clears() {
    assert!(!has_warned("Test", "first message"));

    warn_once("Test", "first message");
    warn_once("Test", "first message");
    assert!(has_warned("Test", "first message"));

    // Same message under another component is a different warning.
    assert!(!has_warned("Other", "first message"));

    clear_warnings();
    assert!(!has_warned("Test", "first message"));
}
