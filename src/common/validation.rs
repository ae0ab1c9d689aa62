// src/common/validation.rs

use std::borrow::Cow;

use validator::ValidationError;

// `length(min = 1)` aceita "   ": aqui o texto é medido já sem espaços
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_blank() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("\t\n").is_err());
        assert!(not_blank("").is_err());
        assert!(not_blank(" Acme ").is_ok());
    }
}
