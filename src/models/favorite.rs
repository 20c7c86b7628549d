use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// Root-anchored, unescaped path. Directories keep their trailing `/`.
    pub path: String,
    pub name: String,
}
