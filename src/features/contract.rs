//! The feature contract shared by validation and mapping.
//!
//! `FEATURE_NAMES` is the exact column order the model was trained on and
//! `ONE_HOT_GROUPS` lists the mutually exclusive indicator sets. A retrain that
//! changes the encoding must update both tables together with the artifact.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::features::request::ChurnRequest;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Model input columns, in trained order.
pub const FEATURE_NAMES: [&str; 45] = [
    "senior_citizen",
    "tenure",
    "monthly_charges",
    "total_charges",
    "female",
    "male",
    "no_partner",
    "yes_partner",
    "no_dependents",
    "yes_dependents",
    "no_phone_service",
    "yes_phone_service",
    "no_multiple_lines",
    "no_phone_service_multiple_lines",
    "yes_multiple_lines",
    "dsl_internet_service",
    "fiber_optic_internet_service",
    "no_internet_service",
    "no_online_security",
    "no_internet_service_online_security",
    "yes_online_security",
    "no_online_backup",
    "no_internet_service_online_backup",
    "yes_online_backup",
    "no_device_protection",
    "no_internet_service_device_protection",
    "yes_device_protection",
    "no_tech_support",
    "no_internet_service_tech_support",
    "yes_tech_support",
    "no_streaming_tv",
    "no_internet_service_streaming_tv",
    "yes_streaming_tv",
    "no_streaming_movies",
    "no_internet_service_streaming_movies",
    "yes_streaming_movies",
    "month_to_month_contract",
    "one_year_contract",
    "two_year_contract",
    "no_paperless_billing",
    "yes_paperless_billing",
    "bank_transfer_automatic_payment_method",
    "credit_card_automatic_payment_method",
    "electronic_check_payment_method",
    "mailed_check_payment_method",
];

/// Columns that are not part of any one-hot group.
pub const FREE_FEATURES: [&str; 4] = ["senior_citizen", "tenure", "monthly_charges", "total_charges"];

/// Free columns that are still indicator flags.
pub const FREE_FLAGS: [&str; 1] = ["senior_citizen"];

/// A categorical attribute encoded as mutually exclusive indicator columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OneHotGroup {
    /// Attribute name reported in validation errors.
    pub name: &'static str,
    /// Indicator columns; exactly one must be set.
    pub fields: &'static [&'static str],
}

/// One-hot groups in declaration order. Validation walks them in this order.
pub static ONE_HOT_GROUPS: [OneHotGroup; 15] = [
    OneHotGroup {
        name: "gender",
        fields: &["male", "female"],
    },
    OneHotGroup {
        name: "partner",
        fields: &["no_partner", "yes_partner"],
    },
    OneHotGroup {
        name: "dependents",
        fields: &["yes_dependents", "no_dependents"],
    },
    OneHotGroup {
        name: "phone_service",
        fields: &["yes_phone_service", "no_phone_service"],
    },
    OneHotGroup {
        name: "multiple_lines",
        fields: &["yes_multiple_lines", "no_phone_service_multiple_lines", "no_multiple_lines"],
    },
    OneHotGroup {
        name: "internet_service",
        fields: &["dsl_internet_service", "fiber_optic_internet_service", "no_internet_service"],
    },
    OneHotGroup {
        name: "online_security",
        fields: &["no_online_security", "no_internet_service_online_security", "yes_online_security"],
    },
    OneHotGroup {
        name: "online_backup",
        fields: &["no_online_backup", "no_internet_service_online_backup", "yes_online_backup"],
    },
    OneHotGroup {
        name: "device_protection",
        fields: &[
            "no_device_protection",
            "no_internet_service_device_protection",
            "yes_device_protection",
        ],
    },
    OneHotGroup {
        name: "tech_support",
        fields: &["no_tech_support", "no_internet_service_tech_support", "yes_tech_support"],
    },
    OneHotGroup {
        name: "streaming_tv",
        fields: &["no_streaming_tv", "no_internet_service_streaming_tv", "yes_streaming_tv"],
    },
    OneHotGroup {
        name: "streaming_movies",
        fields: &[
            "no_streaming_movies",
            "no_internet_service_streaming_movies",
            "yes_streaming_movies",
        ],
    },
    OneHotGroup {
        name: "contract",
        fields: &["month_to_month_contract", "one_year_contract", "two_year_contract"],
    },
    OneHotGroup {
        name: "paperless_billing",
        fields: &["yes_paperless_billing", "no_paperless_billing"],
    },
    OneHotGroup {
        name: "payment_method",
        fields: &[
            "bank_transfer_automatic_payment_method",
            "credit_card_automatic_payment_method",
            "mailed_check_payment_method",
            "electronic_check_payment_method",
        ],
    },
];

/// Inconsistencies between the contract tables and the request schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("feature '{0}' is declared more than once")]
    DuplicateFeature(&'static str),

    #[error("group '{group}' references undeclared feature '{field}'")]
    UndeclaredGroupField {
        group: &'static str,
        field: &'static str,
    },

    #[error("feature '{field}' belongs to both '{first}' and '{second}'")]
    OverlappingGroups {
        field: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("feature '{0}' has no source field on the request")]
    UnmappedFeature(&'static str),

    #[error("feature '{0}' is neither free nor part of a one-hot group")]
    UngroupedFeature(&'static str),
}

/// Look up a group by name.
pub fn group(name: &str) -> Option<&'static OneHotGroup> {
    ONE_HOT_GROUPS.iter().find(|g| g.name == name)
}

/// Check the contract tables against each other and against `ChurnRequest`.
///
/// Runs once at startup; any error means the binary was built with a
/// contract that cannot serve the trained model.
pub fn verify() -> Result<(), ContractError> {
    let mut seen = HashSet::with_capacity(FEATURE_COUNT);
    for name in FEATURE_NAMES {
        if !seen.insert(name) {
            return Err(ContractError::DuplicateFeature(name));
        }
        if !ChurnRequest::has_field(name) {
            return Err(ContractError::UnmappedFeature(name));
        }
    }

    let mut owner: Vec<(&'static str, &'static str)> = Vec::new();
    for group in ONE_HOT_GROUPS.iter() {
        for &field in group.fields {
            if !seen.contains(&field) {
                return Err(ContractError::UndeclaredGroupField {
                    group: group.name,
                    field,
                });
            }
            if let Some((_, first)) = owner.iter().find(|(f, _)| *f == field) {
                return Err(ContractError::OverlappingGroups {
                    field,
                    first: *first,
                    second: group.name,
                });
            }
            owner.push((field, group.name));
        }
    }

    for name in FEATURE_NAMES {
        let grouped = owner.iter().any(|(f, _)| *f == name);
        if !grouped && !FREE_FEATURES.contains(&name) {
            return Err(ContractError::UngroupedFeature(name));
        }
    }

    Ok(())
}
