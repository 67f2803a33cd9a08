// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic validation of resolved settings.
//!
//! Runs after assembly has succeeded. Nothing here aborts early: every failing
//! component and every broken reference ends up in the returned report.

use crate::domain::{
    ComponentID, Kind, Scope, ValidationError, ValidationFailure, ValidationReport,
};
use crate::settings::Settings;

/// Validates every resolved component and the service section.
///
/// Checks, in report order:
/// - at least one receiver and one exporter are configured;
/// - every component passes its own `validate`;
/// - the service section is well formed on its own;
/// - every component the service refers to is declared. Pipeline receivers
///   and exporters may also name connectors.
pub fn validate_all(settings: &Settings) -> Result<(), ValidationReport> {
    let mut failures = Vec::new();

    if settings.receivers.is_empty() {
        failures.push(ValidationFailure {
            scope: Scope::Component(Kind::Receiver),
            id: None,
            error: ValidationError::new("no receiver configuration specified in config"),
        });
    }
    if settings.exporters.is_empty() {
        failures.push(ValidationFailure {
            scope: Scope::Component(Kind::Exporter),
            id: None,
            error: ValidationError::new("no exporter configuration specified in config"),
        });
    }

    for kind in Kind::ALL {
        for (id, error) in settings.configs(kind).validate() {
            failures.push(ValidationFailure {
                scope: Scope::Component(kind),
                id: Some(id),
                error,
            });
        }
    }

    let service_errors = settings
        .service
        .validate()
        .into_iter()
        .chain(dangling_references(settings));
    for error in service_errors {
        failures.push(ValidationFailure {
            scope: Scope::Service,
            id: None,
            error,
        });
    }

    ValidationReport::new(failures).into_result()
}

fn dangling_references(settings: &Settings) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let missing = |field: &str, role: &str, id: &ComponentID| {
        ValidationError::field(
            field,
            format!("references {} {:?} which is not configured", role, id.to_string()),
        )
    };

    for id in &settings.service.extensions {
        if !settings.extensions.contains(id) {
            errors.push(missing("extensions", "extension", id));
        }
    }

    for (pipeline_id, pipeline) in &settings.service.pipelines {
        let field = format!("pipelines::{}", pipeline_id);
        for id in &pipeline.receivers {
            if !settings.receivers.contains(id) && !settings.connectors.contains(id) {
                errors.push(missing(field.as_str(), "receiver", id));
            }
        }
        for id in &pipeline.processors {
            if !settings.processors.contains(id) {
                errors.push(missing(field.as_str(), "processor", id));
            }
        }
        for id in &pipeline.exporters {
            if !settings.exporters.contains(id) && !settings.connectors.contains(id) {
                errors.push(missing(field.as_str(), "exporter", id));
            }
        }
    }

    errors
}
