use super::*;
use serial_test::serial;

#[test]
#[serial(shutdown_flag)]
fn test_shutdown_flag_transitions() {
    reset_for_test();

    // Initially not shutting down
    assert!(!is_shutting_down());

    // After signal, should be shutting down
    signal_shutdown();
    assert!(is_shutting_down());

    // Should remain true
    signal_shutdown();
    assert!(is_shutting_down());

    reset_for_test();
}
