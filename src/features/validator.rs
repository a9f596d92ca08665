//! One-hot exclusivity checks.
//!
//! Groups are checked in contract declaration order so the first reported
//! violation is stable for a given request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::contract::{FREE_FLAGS, ONE_HOT_GROUPS};
use crate::features::request::ChurnRequest;

/// How strictly indicator values are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Every flag must be 0 or 1, then each group must sum to 1.
    #[default]
    Strict,
    /// Only the group sums are checked; `{2, -1, 0}` passes.
    Lenient,
}

/// A request that violates the one-hot encoding.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("exactly one option must be selected for '{group}' (got {sum})")]
    GroupSum { group: &'static str, sum: f64 },

    #[error("'{field}' in '{group}' must be 0 or 1 (got {value})")]
    NonBinaryFlag {
        group: &'static str,
        field: &'static str,
        value: f64,
    },

    #[error("'{group}' references '{field}', which the request does not carry")]
    UnresolvedField {
        group: &'static str,
        field: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending group (or free flag).
    pub fn group(&self) -> &'static str {
        match self {
            ValidationError::GroupSum { group, .. }
            | ValidationError::NonBinaryFlag { group, .. }
            | ValidationError::UnresolvedField { group, .. } => group,
        }
    }
}

/// Validate with binary flag checks enabled.
pub fn validate(request: &ChurnRequest) -> Result<(), ValidationError> {
    validate_with(request, ValidationMode::Strict)
}

/// Validate a request against the one-hot contract.
pub fn validate_with(request: &ChurnRequest, mode: ValidationMode) -> Result<(), ValidationError> {
    if mode == ValidationMode::Strict {
        for &field in FREE_FLAGS.iter() {
            let value = read(request, field, field)?;
            check_binary(field, field, value)?;
        }
    }

    for group in ONE_HOT_GROUPS.iter() {
        let mut sum = 0.0;
        for &field in group.fields {
            let value = read(request, group.name, field)?;
            if mode == ValidationMode::Strict {
                check_binary(group.name, field, value)?;
            }
            sum += value;
        }
        if sum != 1.0 {
            return Err(ValidationError::GroupSum {
                group: group.name,
                sum,
            });
        }
    }

    Ok(())
}

fn read(
    request: &ChurnRequest,
    group: &'static str,
    field: &'static str,
) -> Result<f64, ValidationError> {
    request
        .field(field)
        .ok_or(ValidationError::UnresolvedField { group, field })
}

fn check_binary(group: &'static str, field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value == 0.0 || value == 1.0 {
        Ok(())
    } else {
        Err(ValidationError::NonBinaryFlag { group, field, value })
    }
}
