//! Shared types used across the codebase

/// Blog mutations that pass through the ownership guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Update,
    Delete,
}

impl std::fmt::Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            Mutation::Update => "update",
            Mutation::Delete => "delete",
        };
        f.write_str(verb)
    }
}
