use std::collections::HashMap;
use std::fmt;

/// Who issued a command; bindings are kept per operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperatorId(String);

impl OperatorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table document resolved by the store: its store-side id and the name
/// the operator chose it by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
}

/// Operator -> selected document. Entries live until replaced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentBindings {
    by_operator: HashMap<OperatorId, DocumentRef>,
}

impl DocumentBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous binding, if any.
    pub fn bind(&mut self, operator: OperatorId, document: DocumentRef) -> Option<DocumentRef> {
        self.by_operator.insert(operator, document)
    }

    pub fn get(&self, operator: &OperatorId) -> Option<&DocumentRef> {
        self.by_operator.get(operator)
    }
}
