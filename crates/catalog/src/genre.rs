use serde::{Deserialize, Serialize};

use bookswap_core::{GenreId, Lifecycle};

/// Genre reference entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub lifecycle: Lifecycle,
}
