use super::statement::{Phase, StatementTemplate};

/// Ordered stage-load and transform-insert statements.
///
/// The two buckets are kept apart; nothing here ever merges or reorders them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    stage_statements: Vec<StatementTemplate>,
    insert_statements: Vec<StatementTemplate>,
}

impl Catalog {
    pub fn new(
        stage_statements: Vec<StatementTemplate>,
        insert_statements: Vec<StatementTemplate>,
    ) -> Self {
        Self {
            stage_statements,
            insert_statements,
        }
    }

    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn stage_statements(&self) -> &[StatementTemplate] {
        &self.stage_statements
    }

    pub fn insert_statements(&self) -> &[StatementTemplate] {
        &self.insert_statements
    }

    pub fn statements(&self, phase: Phase) -> &[StatementTemplate] {
        match phase {
            Phase::Stage => self.stage_statements(),
            Phase::Insert => self.insert_statements(),
        }
    }

    pub fn len(&self) -> usize {
        self.stage_statements.len() + self.insert_statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    stage_statements: Vec<StatementTemplate>,
    insert_statements: Vec<StatementTemplate>,
}

impl CatalogBuilder {
    pub fn stage(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.stage_statements.push(StatementTemplate::new(name, sql));
        self
    }

    pub fn insert(mut self, name: impl Into<String>, sql: impl Into<String>) -> Self {
        self.insert_statements.push(StatementTemplate::new(name, sql));
        self
    }

    pub fn build(self) -> Catalog {
        Catalog::new(self.stage_statements, self.insert_statements)
    }
}
