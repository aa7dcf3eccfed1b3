//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// Values without `${` are returned unchanged, so a bare `$` is literal.
/// `field` names the configuration key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("FOLIO_TEST_LOCALE", "de_CH");
        }
        let result = expand_env("${FOLIO_TEST_LOCALE}", "l10n.locale").unwrap();
        assert_eq!(result, "de_CH");
        unsafe {
            std::env::remove_var("FOLIO_TEST_LOCALE");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("FOLIO_TEST_UNSET");
        }
        let result = expand_env("${FOLIO_TEST_UNSET:-en_GB}", "l10n.locale").unwrap();
        assert_eq!(result, "en_GB");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("FOLIO_TEST_MISSING");
        }
        let err = expand_env("${FOLIO_TEST_MISSING}", "l10n.locale").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in l10n.locale: ${FOLIO_TEST_MISSING} not set"
        );
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("fr_CA", "l10n.locale").unwrap(), "fr_CA");
        assert_eq!(expand_env("$LANG", "l10n.locale").unwrap(), "$LANG");
    }
}
