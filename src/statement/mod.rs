//! MySQL SELECT statement construction.
//!
//! The [`Select`] builder owns table slots ([`Table`]), projected columns and
//! the WHERE / ORDER BY / LIMIT clauses of one statement and renders them as
//! text. Table aliases come from an injected [`TagGenerator`].

pub mod alias;
pub mod errors;
pub mod select;
pub mod table;
pub mod to_sql;


pub use alias::{SequentialTags, SharedTags, Tag, TagGenerator};
pub use errors::StatementError;
pub use select::{ColumnId, Limit, OrderBy, OrderDirection, Select};
pub use table::{ConditionPart, Join, JoinCondition, JoinKind, Source, Table, TableId, TableSource};

/// Anything that renders to a SQL fragment.
pub trait ToSql {
    fn to_sql(&self) -> String;
}

impl ToSql for str {
    fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl ToSql for String {
    fn to_sql(&self) -> String {
        self.clone()
    }
}

impl<T: ToSql + ?Sized> ToSql for &T {
    fn to_sql(&self) -> String {
        (**self).to_sql()
    }
}
