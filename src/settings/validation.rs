//! Settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate bind addresses and TLS material before the server starts
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Runs before settings are accepted into the system

use std::fs;
use std::io::BufReader;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::settings::schema::{Settings, TlsSettings};

#[derive(Debug)]
pub enum ValidationError {
    InvalidBindAddress { field: &'static str, value: String },
    EmptyApiKey,
    MissingTlsFile { field: &'static str, path: PathBuf },
    InvalidPem { field: &'static str, path: PathBuf },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress { field, value } => {
                write!(f, "{field}: {value:?} is not a valid socket address")
            }
            ValidationError::EmptyApiKey => write!(f, "api.api_key may not be empty"),
            ValidationError::MissingTlsFile { field, path } => {
                write!(f, "{field}: file not found: {path:?}")
            }
            ValidationError::InvalidPem { field, path } => {
                write!(f, "{field}: no usable PEM material in {path:?}")
            }
        }
    }
}

/// Validate the settings, collecting every error.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.api.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            field: "api.bind_address",
            value: settings.api.bind_address.clone(),
        });
    }
    if settings.api.api_key.is_empty() {
        errors.push(ValidationError::EmptyApiKey);
    }
    if settings.observability.metrics_enabled
        && settings
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress {
            field: "observability.metrics_address",
            value: settings.observability.metrics_address.clone(),
        });
    }
    if let Some(tls) = &settings.api.tls {
        check_tls(tls, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_tls(tls: &TlsSettings, errors: &mut Vec<ValidationError>) {
    match fs::File::open(&tls.cert_path) {
        Ok(file) => {
            let certs: Result<Vec<_>, _> = rustls_pemfile::certs(&mut BufReader::new(file)).collect();
            match certs {
                Ok(certs) if certs.is_empty() => errors.push(ValidationError::InvalidPem {
                    field: "api.tls.cert_path",
                    path: tls.cert_path.clone(),
                }),
                Ok(_) => {}
                Err(_) => errors.push(ValidationError::InvalidPem {
                    field: "api.tls.cert_path",
                    path: tls.cert_path.clone(),
                }),
            }
        }
        Err(_) => errors.push(ValidationError::MissingTlsFile {
            field: "api.tls.cert_path",
            path: tls.cert_path.clone(),
        }),
    }

    match fs::File::open(&tls.key_path) {
        Ok(file) => match rustls_pemfile::private_key(&mut BufReader::new(file)) {
            Ok(Some(_)) => {}
            _ => errors.push(ValidationError::InvalidPem {
                field: "api.tls.key_path",
                path: tls.key_path.clone(),
            }),
        },
        Err(_) => errors.push(ValidationError::MissingTlsFile {
            field: "api.tls.key_path",
            path: tls.key_path.clone(),
        }),
    }
}
