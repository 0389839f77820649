use serde::{Deserialize, Serialize};

use trama_weave::SHARED_PAGE_ID;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Pseudo-page whose rows are woven into every reconstruction.
    pub shared_page_id: String,
    /// Ceiling on fields per edit batch.
    pub max_edits_per_call: usize,
    /// Ceiling on keys per bulk deletion.
    pub max_deletes_per_call: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            shared_page_id: SHARED_PAGE_ID.to_string(),
            max_edits_per_call: 50,
            max_deletes_per_call: 25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServiceConfig::default();
        assert_eq!(c.shared_page_id, "__shared__");
        assert_eq!(c.max_edits_per_call, 50);
        assert_eq!(c.max_deletes_per_call, 25);
    }
}
