//! Owned resource references

use serde::{Deserialize, Serialize};

/// Kinds of resources that carry an owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Blog post
    Post,
    /// Comment on a post
    Comment,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Post => write!(f, "post"),
            Self::Comment => write!(f, "comment"),
        }
    }
}

/// Reference to a single owned resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: u64,
}

impl ResourceRef {
    /// Reference a post by ID
    pub fn post(id: u64) -> Self {
        Self {
            kind: ResourceKind::Post,
            id,
        }
    }

    /// Reference a comment by ID
    pub fn comment(id: u64) -> Self {
        Self {
            kind: ResourceKind::Comment,
            id,
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ref_display() {
        assert_eq!(ResourceRef::post(3).to_string(), "post/3");
        assert_eq!(ResourceRef::comment(9).to_string(), "comment/9");
    }
}
