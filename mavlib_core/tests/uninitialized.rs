//! S4: every codec entry point must reject calls made before `Catalog::initialize`.
//!
//! This has to live in its own integration test binary — the catalog is a process-wide
//! singleton, so once any other test initializes it there is no way back to the uninitialized
//! state within the same process.

#[test]
fn try_parse_reports_not_initialized() {
    let err = mavlib_core::try_parse(&[0xFD, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, mavlib_core::DecodeError::NotInitialized(_)));
}

#[test]
fn try_parse_streaming_reports_not_initialized() {
    let err = mavlib_core::try_parse_streaming(&[]).unwrap_err();
    assert!(matches!(err, mavlib_core::DecodeError::NotInitialized(_)));
}
