use std::{fs, sync::Arc};

use baton_log::{instance, teardown, Level, LogError, DEFAULT_LOG_PATH};

// Everything in one test; the shared instance is process-global.
#[test]
fn shared_instance_lifecycle() -> Result<(), LogError> {
    let first = instance(Level::Debug)?;
    let again = instance(Level::Debug)?;
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(again.threshold(), Level::Debug);

    // A different threshold replaces the instance outright.
    let replaced = instance(Level::Error)?;
    assert!(!Arc::ptr_eq(&first, &replaced));
    assert_eq!(replaced.threshold(), Level::Error);
    assert!(!first.is_running());
    assert!(replaced.is_running());

    teardown();
    assert!(!replaced.is_running());

    // After a teardown the next call starts from scratch.
    let fresh = instance(Level::Info)?;
    assert!(fresh.is_running());
    assert!(!Arc::ptr_eq(&replaced, &fresh));
    teardown();

    let _ = fs::remove_file(DEFAULT_LOG_PATH);
    Ok(())
}
