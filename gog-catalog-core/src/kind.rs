/// Entity kinds stored in the host framework.
///
/// This enum centralizes collection identity (REST collection path, content
/// type UID, display name) in one place, so callers never build host
/// identifiers from strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Game,
    Developer,
    Publisher,
    Category,
    Platform,
}

/// All entity kinds in registration order.
const ALL_KINDS: &[EntityKind] = &[
    EntityKind::Game,
    EntityKind::Developer,
    EntityKind::Publisher,
    EntityKind::Category,
    EntityKind::Platform,
];

impl EntityKind {
    /// Singular identifier used in the host's content type UID.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Game => "game",
            Self::Developer => "developer",
            Self::Publisher => "publisher",
            Self::Category => "category",
            Self::Platform => "platform",
        }
    }

    /// Plural REST collection segment (`/api/{collection}`).
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Game => "games",
            Self::Developer => "developers",
            Self::Publisher => "publishers",
            Self::Category => "categories",
            Self::Platform => "platforms",
        }
    }

    /// Content type UID, e.g. `api::game.game`. Used as the upload `ref`.
    pub fn uid(&self) -> String {
        format!("api::{0}.{0}", self.short_name())
    }

    /// Human-readable name for logs and summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Game => "Game",
            Self::Developer => "Developer",
            Self::Publisher => "Publisher",
            Self::Category => "Category",
            Self::Platform => "Platform",
        }
    }

    pub fn all() -> &'static [EntityKind] {
        ALL_KINDS
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
#[path = "tests/kind_tests.rs"]
mod tests;
