use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PackError::invalid_configuration("x")
            .to_string()
            .contains("invalid configuration:")
    );
    assert!(
        PackError::source_not_found("x")
            .to_string()
            .contains("source not found:")
    );
    assert!(PackError::encode("x").to_string().contains("encode error:"));
    assert!(
        PackError::manifest_write("x")
            .to_string()
            .contains("manifest write error:")
    );
}

#[test]
fn kind_matches_variant() {
    assert_eq!(
        PackError::invalid_configuration("x").kind(),
        ErrorKind::InvalidConfiguration
    );
    assert_eq!(PackError::source_not_found("x").kind(), ErrorKind::SourceNotFound);
    assert_eq!(PackError::encode("x").kind(), ErrorKind::Encode);
    assert_eq!(PackError::manifest_write("x").kind(), ErrorKind::ManifestWrite);
    assert_eq!(
        PackError::Other(anyhow::anyhow!("boom")).kind(),
        ErrorKind::Other
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PackError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
