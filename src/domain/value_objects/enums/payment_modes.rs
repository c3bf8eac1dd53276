use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    Mock,
    Live,
}

impl Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            PaymentMode::Mock => "mock",
            PaymentMode::Live => "live",
        };
        write!(f, "{}", mode)
    }
}

impl PaymentMode {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "mock" => Some(PaymentMode::Mock),
            "live" => Some(PaymentMode::Live),
            _ => None,
        }
    }
}
