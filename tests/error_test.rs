//! Tests for error types

use petrolog::Error;

#[test]
fn test_missing_columns_lists_every_name() {
    let error = Error::missing_columns("rgbe_rpbe", ["GR", "PHIE"]);
    assert_eq!(
        format!("{error}"),
        "Missing required columns for rgbe_rpbe: GR, PHIE"
    );
    assert!(error.is_structural());
}

#[test]
fn test_type_coercion_error() {
    let error = Error::TypeCoercion {
        column: "WELL_NAME".to_string(),
        data_type: "Utf8".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("WELL_NAME"));
    assert!(error_str.contains("Utf8"));
    assert!(error.is_structural());
}

#[test]
fn test_invalid_parameter_error() {
    let error = Error::InvalidParameter {
        name: "window_size".to_string(),
        reason: "must be at least 1".to_string(),
    };
    assert_eq!(
        format!("{error}"),
        "Invalid parameter 'window_size': must be at least 1"
    );
    assert!(error.is_structural());
}

#[test]
fn test_calculation_failed_error() {
    let error = Error::CalculationFailed {
        calculation: "swgrad".to_string(),
        message: "worker panicked".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("swgrad calculation error"));
    assert!(error_str.contains("worker panicked"));
    assert!(!error.is_structural());
}

#[test]
fn test_storage_error() {
    let error = Error::StorageError("file not found".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Storage error"));
    assert!(error_str.contains("file not found"));
    assert!(!error.is_structural());
}

#[test]
fn test_session_errors() {
    assert_eq!(format!("{}", Error::NoDatasetSelected), "No dataset selected");
    let error = Error::DatasetNotFound("fix_pass".to_string());
    assert!(format!("{error}").contains("fix_pass"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error message".to_string());
    let error_str = format!("{error}");
    assert_eq!(error_str, "custom error message");
}

#[test]
fn test_error_debug() {
    let error = Error::NoDatasetSelected;
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("NoDatasetSelected"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> petrolog::Result<i32> {
        Err(Error::Other("test error".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
