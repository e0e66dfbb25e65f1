// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use trip_savings_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_file_format() {
        let err = CoreError::InvalidFileFormat("bad header".into());
        assert_eq!(err.to_string(), "Invalid file format: bad header");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(99);
        assert_eq!(err.to_string(), "Unsupported file version: 99");
    }

    #[test]
    fn encryption() {
        let err = CoreError::Encryption("cipher init".into());
        assert_eq!(err.to_string(), "Encryption failed: cipher init");
    }

    #[test]
    fn decryption_has_fixed_message() {
        assert_eq!(
            CoreError::Decryption.to_string(),
            "Decryption failed — wrong password or corrupted file"
        );
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("rate must be positive".into());
        assert_eq!(err.to_string(), "Validation failed: rate must be positive");
    }

    #[test]
    fn trip_not_found_includes_id() {
        let err = CoreError::TripNotFound("abc-123".into());
        assert_eq!(err.to_string(), "Trip not found: abc-123");
    }

    #[test]
    fn product_not_found_includes_id() {
        let err = CoreError::ProductNotFound("def-456".into());
        assert_eq!(err.to_string(), "Product not found: def-456");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }
}

// ── From impls ──────────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn io_error_becomes_file_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn serde_json_error_becomes_deserialization() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = parse_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn bincode_error_becomes_serialization() {
        let decode_err =
            bincode::deserialize::<trip_savings_core::models::book::TripBook>(&[0xFF])
                .unwrap_err();
        let err: CoreError = decode_err.into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn errors_are_debug_printable() {
        let err = CoreError::TripNotFound("abc".into());
        assert!(format!("{err:?}").contains("TripNotFound"));
    }
}
