//! Happiness pulse submissions.

use serde::{Deserialize, Serialize};

/// One user's monthly survey answer. `month` is `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HappinessPulse {
    pub user_id: String,
    pub score: u8,
    pub suggestion: String,
    pub month: String,
    pub year: i32,
}
