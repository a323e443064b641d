use super::Type;

/// Documentation extracted from WIT doc comments. Never semantically significant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Docs {
    pub contents: Option<String>,
}

impl Docs {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contents.as_deref().map_or(true, str::is_empty)
    }
}

/// A named function parameter, or a named function result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}
