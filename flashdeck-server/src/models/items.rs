//! Plural response envelope

use serde::{Deserialize, Serialize};

/// Wrapper for list responses: `{"items": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for Items<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}
