//! Entity validation collaborator.
//!
//! # Responsibilities
//! - Semantic validation of entity content (serde handles syntactic)
//! - Check referential integrity (frontends reference existing farms)
//! - Enforce the name/resource coherence the store's repositories rely on
//!
//! # Design Decisions
//! - Runs before the store's version guard, so a rejected entity never
//!   consumes a version check
//! - Referential checks run against the last committed snapshot; a
//!   concurrent change that would invalidate them also changes the version,
//!   so the guard catches the race

use thiserror::Error;

use crate::model::{Farm, Frontend};
use crate::store::ConfigSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("entity name may not be empty")]
    EmptyName,

    #[error("invalid entity name {name:?}: only alphanumerics, '-', '_' and '.' are allowed")]
    InvalidName { name: String },

    #[error("entity name {body:?} does not match resource name {path:?}")]
    NameMismatch { path: String, body: String },

    #[error("frontend {name:?} references unknown farm {farm:?}")]
    UnknownFarm { name: String, farm: String },
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(ValidationError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

pub fn validate_frontend(
    frontend: &Frontend,
    snapshot: &ConfigSnapshot,
) -> Result<(), ValidationError> {
    validate_name(&frontend.name)?;
    if let Some(farm) = &frontend.default_farm {
        if !snapshot.farms.contains(farm) {
            return Err(ValidationError::UnknownFarm {
                name: frontend.name.clone(),
                farm: farm.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_farm(farm: &Farm, _snapshot: &ConfigSnapshot) -> Result<(), ValidationError> {
    validate_name(&farm.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Protocol;

    fn frontend(name: &str, default_farm: Option<&str>) -> Frontend {
        Frontend {
            name: name.to_string(),
            protocol: Protocol::Http,
            log: None,
            log_format: None,
            log_ignore_null: None,
            http_connection_mode: None,
            continuous_statistics: None,
            http_request_timeout: None,
            http_keepalive_timeout: None,
            client_inactivity_timeout: None,
            max_connections: None,
            default_farm: default_farm.map(str::to_string),
        }
    }

    #[test]
    fn test_name_charset() {
        let snapshot = ConfigSnapshot::bootstrap();
        assert!(validate_frontend(&frontend("web-1.prod", None), &snapshot).is_ok());
        assert_eq!(
            validate_frontend(&frontend("", None), &snapshot),
            Err(ValidationError::EmptyName)
        );
        assert!(matches!(
            validate_frontend(&frontend("web 1", None), &snapshot),
            Err(ValidationError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_default_farm_must_exist() {
        let snapshot = ConfigSnapshot::bootstrap();
        assert!(matches!(
            validate_frontend(&frontend("web", Some("missing")), &snapshot),
            Err(ValidationError::UnknownFarm { .. })
        ));
    }
}
