//! `${VAR}` expansion for `server.host`, `docs.base_path` and
//! `clidoc.output_dir`.
//!
//! An unset variable without a `:-default` fails the load and names the
//! field, so a missing `MDOC_BASE_PATH` surfaces as
//! `Environment variable error in docs.base_path`.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` in one config value.
///
/// Bare `$VAR` is left alone; usage strings like `$PROFILE` pass through.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let lookup = |var: &str| std::env::var(var).map(Some).map_err(|_| UnsetVar(var.to_owned()));
    match shellexpand::env_with_context(value, lookup) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(err) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", err.cause.0),
        }),
    }
}

/// Expand a value that may be absent from `mdoc.toml`.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(inner) = value.as_deref() {
        *value = Some(expand_env(inner, field)?);
    }
    Ok(())
}

/// Variable that had no value.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_host_from_env() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDOC_TEST_HOST", "0.0.0.0");
        }
        assert_eq!(expand_env("${MDOC_TEST_HOST}", "server.host").unwrap(), "0.0.0.0");
        unsafe {
            std::env::remove_var("MDOC_TEST_HOST");
        }
    }

    #[test]
    fn test_expand_base_path_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDOC_TEST_UNSET_BASE");
        }
        assert_eq!(
            expand_env("${MDOC_TEST_UNSET_BASE:-/docs}", "docs.base_path").unwrap(),
            "/docs"
        );
    }

    #[test]
    fn test_expand_unset_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDOC_TEST_MISSING_OUT");
        }
        let err = expand_env("${MDOC_TEST_MISSING_OUT}/cli", "clidoc.output_dir").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in clidoc.output_dir: ${MDOC_TEST_MISSING_OUT} not set"
        );
    }

    #[test]
    fn test_expand_inside_base_path() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDOC_TEST_VERSION", "3.5");
        }
        assert_eq!(
            expand_env("/docs/${MDOC_TEST_VERSION}", "docs.base_path").unwrap(),
            "/docs/3.5"
        );
        unsafe {
            std::env::remove_var("MDOC_TEST_VERSION");
        }
    }

    #[test]
    fn test_profile_placeholder_passes_through() {
        assert_eq!(expand_env("$PROFILE", "docs.base_path").unwrap(), "$PROFILE");
    }

    #[test]
    fn test_expand_opt_absent_value() {
        let mut value: Option<String> = None;
        expand_opt(&mut value, "clidoc.output_dir").unwrap();
        assert_eq!(value, None);
    }
}
