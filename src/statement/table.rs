//! Table descriptors: the FROM source, joins and nested statements.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::alias::{Tag, TagGenerator};

/// Position of a table slot within one statement. `0` is the FROM source.
pub type TableId = usize;

/// Something that can stand after FROM or JOIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A schema table, rendered as a quoted identifier.
    Table(String),
    /// A fully rendered nested statement.
    Subquery(String),
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        Source::Table(name.to_string())
    }
}

impl From<String> for Source {
    fn from(name: String) -> Self {
        Source::Table(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    /// Inner iff the relationship can neither be absent nor repeat.
    pub fn from_cardinality(is_optional: bool, is_many: bool) -> Self {
        if !is_optional && !is_many {
            JoinKind::Inner
        } else {
            JoinKind::Left
        }
    }
}

/// One piece of a join condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionPart {
    Text(String),
    /// Alias of the table the join hangs off.
    LeftAlias,
    /// Alias of the joined table itself.
    SelfAlias,
}

/// ON-condition of a join with explicit alias references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinCondition {
    parts: Vec<ConditionPart>,
}

impl JoinCondition {
    /// Placeholder standing for the left table's alias in textual templates.
    pub const LEFT_PLACEHOLDER: &'static str = "`0`";
    /// Placeholder standing for the joined table's alias in textual templates.
    pub const SELF_PLACEHOLDER: &'static str = "`1`";

    /// Parses a textual template such as `` `0`.`Id` = `1`.`OwnerId` ``.
    ///
    /// The template is split on whitespace and re-joined with single spaces.
    /// Within each token the left placeholder is tried first and the self
    /// placeholder second; only the first one found is substituted (all of its
    /// occurrences in that token), the other is kept as literal text.
    pub fn parse(template: &str) -> Self {
        let mut condition = JoinCondition { parts: Vec::new() };

        for (i, token) in template.split_whitespace().enumerate() {
            if i > 0 {
                condition.push_text(" ");
            }

            let substitution = [
                (Self::LEFT_PLACEHOLDER, ConditionPart::LeftAlias),
                (Self::SELF_PLACEHOLDER, ConditionPart::SelfAlias),
            ]
            .into_iter()
            .find(|(placeholder, _)| token.contains(*placeholder));

            match substitution {
                Some((placeholder, part)) => {
                    for (j, piece) in token.split(placeholder).enumerate() {
                        if j > 0 {
                            condition.parts.push(part.clone());
                        }
                        condition.push_text(piece);
                    }
                }
                None => condition.push_text(token),
            }
        }

        condition
    }

    /// Builds `<left>.<left_column> = <self>.<right_column>`.
    pub fn equals(left_column: &str, right_column: &str) -> Self {
        let mut condition = JoinCondition {
            parts: vec![ConditionPart::LeftAlias],
        };
        condition.push_text(&format!(".{} = ", left_column));
        condition.parts.push(ConditionPart::SelfAlias);
        condition.push_text(&format!(".{}", right_column));
        condition
    }

    pub fn parts(&self) -> &[ConditionPart] {
        &self.parts
    }

    pub fn references_aliases(&self) -> bool {
        self.parts
            .iter()
            .any(|part| !matches!(part, ConditionPart::Text(_)))
    }

    /// Renders the condition with the given (already quoted) aliases.
    pub fn render(&self, left: &str, own: &str) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                ConditionPart::Text(text) => text.as_str(),
                ConditionPart::LeftAlias => left,
                ConditionPart::SelfAlias => own,
            })
            .collect()
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(ConditionPart::Text(last)) = self.parts.last_mut() {
            last.push_str(text);
        } else {
            self.parts.push(ConditionPart::Text(text.to_string()));
        }
    }
}

impl fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Self::LEFT_PLACEHOLDER, Self::SELF_PLACEHOLDER))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Join {
    pub left: TableId,
    pub right: Source,
    pub condition: JoinCondition,
    pub kind: JoinKind,
}

/// What a table slot refers to; the identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableSource {
    From(Source),
    Join(Join),
}

/// A table slot: a source plus the tag it was given at construction.
///
/// Equality and hashing look at the source only, so two descriptors built
/// separately for the same join compare equal even though their tags differ.
#[derive(Debug, Clone)]
pub struct Table {
    source: TableSource,
    tag: Tag,
}

impl Table {
    pub fn new(source: TableSource, tags: &dyn TagGenerator) -> Self {
        Table {
            source,
            tag: tags.next_tag(),
        }
    }

    pub fn base(name: impl Into<String>, tags: &dyn TagGenerator) -> Self {
        Self::new(TableSource::From(Source::Table(name.into())), tags)
    }

    pub fn subquery(sql: impl Into<String>, tags: &dyn TagGenerator) -> Self {
        Self::new(TableSource::From(Source::Subquery(sql.into())), tags)
    }

    pub fn source(&self) -> &TableSource {
        &self.source
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Table {}

impl Hash for Table {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}
