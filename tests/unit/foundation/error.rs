use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CardError::decode("x").to_string().contains("decode error:"));
    assert!(CardError::font("x").to_string().contains("font error:"));
    assert!(CardError::render("x").to_string().contains("render error:"));
    assert!(
        CardError::generation("x")
            .to_string()
            .contains("generation error:")
    );
    assert!(
        CardError::EmptyGeneration
            .to_string()
            .contains("generation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn user_message_is_generic_except_for_validation() {
    assert_eq!(
        CardError::EmptyGeneration.user_message(),
        GENERIC_GENERATION_MESSAGE
    );
    assert_eq!(
        CardError::generation("http 503").user_message(),
        GENERIC_GENERATION_MESSAGE
    );
    assert_eq!(
        CardError::validation("Por favor, envie uma foto.").user_message(),
        "Por favor, envie uma foto."
    );
}
