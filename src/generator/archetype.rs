use crate::model::{detail_path, list_path, MockMethod};
use std::fmt;

/// The five fixed CRUD operations generated for every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    ListQuery,
    DetailQuery,
    Create,
    Update,
    Delete,
}

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::ListQuery,
        Archetype::DetailQuery,
        Archetype::Create,
        Archetype::Update,
        Archetype::Delete,
    ];

    #[must_use]
    pub fn method(&self) -> MockMethod {
        match self {
            Archetype::ListQuery | Archetype::DetailQuery => MockMethod::Get,
            Archetype::Create => MockMethod::Post,
            Archetype::Update => MockMethod::Put,
            Archetype::Delete => MockMethod::Delete,
        }
    }

    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Archetype::ListQuery)
    }

    /// Operations addressed at a single item through `/{id}`.
    #[must_use]
    pub fn is_detail(&self) -> bool {
        matches!(
            self,
            Archetype::DetailQuery | Archetype::Update | Archetype::Delete
        )
    }

    /// The path this operation must be served under.
    #[must_use]
    pub fn expected_path(&self, entity: &str) -> String {
        if self.is_detail() {
            detail_path(entity)
        } else {
            list_path(entity)
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Archetype::ListQuery => "list-query",
            Archetype::DetailQuery => "detail-query",
            Archetype::Create => "create",
            Archetype::Update => "update",
            Archetype::Delete => "delete",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
