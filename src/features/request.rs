//! Inbound churn request.
//!
//! Every field is already model-ready (post one-hot encoding). Unknown or
//! missing fields are rejected during deserialization, before validation.

use serde::{Deserialize, Serialize};

/// Extracts one model column from a request.
pub type Accessor = fn(&ChurnRequest) -> f64;

macro_rules! churn_request {
    (
        flags: [$($flag:ident),* $(,)?],
        continuous: [$($cont:ident),* $(,)?] $(,)?
    ) => {
        /// A single customer, encoded the way the model was trained.
        #[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
        #[serde(deny_unknown_fields)]
        pub struct ChurnRequest {
            pub senior_citizen: i64,
            pub tenure: i64,
            $(pub $cont: f64,)*
            $(pub $flag: i64,)*
        }

        mod accessors {
            use super::ChurnRequest;

            pub fn senior_citizen(r: &ChurnRequest) -> f64 {
                r.senior_citizen as f64
            }

            pub fn tenure(r: &ChurnRequest) -> f64 {
                r.tenure as f64
            }

            $(
                pub fn $cont(r: &ChurnRequest) -> f64 {
                    r.$cont
                }
            )*

            $(
                pub fn $flag(r: &ChurnRequest) -> f64 {
                    r.$flag as f64
                }
            )*
        }

        /// Name-to-field table. Looked up by contract name, never by reflection.
        static FIELD_ACCESSORS: &[(&str, Accessor)] = &[
            ("senior_citizen", accessors::senior_citizen as Accessor),
            ("tenure", accessors::tenure as Accessor),
            $((stringify!($cont), accessors::$cont as Accessor),)*
            $((stringify!($flag), accessors::$flag as Accessor),)*
        ];
    };
}

churn_request! {
    flags: [
        female,
        male,
        no_partner,
        yes_partner,
        no_dependents,
        yes_dependents,
        no_phone_service,
        yes_phone_service,
        no_multiple_lines,
        no_phone_service_multiple_lines,
        yes_multiple_lines,
        dsl_internet_service,
        fiber_optic_internet_service,
        no_internet_service,
        no_online_security,
        no_internet_service_online_security,
        yes_online_security,
        no_online_backup,
        no_internet_service_online_backup,
        yes_online_backup,
        no_device_protection,
        no_internet_service_device_protection,
        yes_device_protection,
        no_tech_support,
        no_internet_service_tech_support,
        yes_tech_support,
        no_streaming_tv,
        no_internet_service_streaming_tv,
        yes_streaming_tv,
        no_streaming_movies,
        no_internet_service_streaming_movies,
        yes_streaming_movies,
        month_to_month_contract,
        one_year_contract,
        two_year_contract,
        no_paperless_billing,
        yes_paperless_billing,
        bank_transfer_automatic_payment_method,
        credit_card_automatic_payment_method,
        electronic_check_payment_method,
        mailed_check_payment_method,
    ],
    continuous: [monthly_charges, total_charges],
}

impl ChurnRequest {
    /// Read a field by its contract name.
    pub fn field(&self, name: &str) -> Option<f64> {
        Self::accessor(name).map(|get| get(self))
    }

    /// Whether `name` resolves to a request field.
    pub fn has_field(name: &str) -> bool {
        Self::accessor(name).is_some()
    }

    /// Names of every request field, in declaration order.
    pub fn field_names() -> impl Iterator<Item = &'static str> {
        FIELD_ACCESSORS.iter().map(|(name, _)| *name)
    }

    fn accessor(name: &str) -> Option<Accessor> {
        FIELD_ACCESSORS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, get)| *get)
    }
}
