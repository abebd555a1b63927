use serde::{Deserialize, Serialize};

use super::flexible_id;

/// A school as listed by `GET /admin/schools`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct School {
    #[serde(deserialize_with = "flexible_id")]
    pub school_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
}

impl School {
    /// "Address, District" with whichever parts are present.
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [self.address.as_deref(), self.district.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}
