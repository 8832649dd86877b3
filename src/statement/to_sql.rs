//! Text rendering helpers shared by the statement builder.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::select::{Limit, OrderBy, OrderDirection};
use super::table::{JoinKind, Source};
use super::ToSql;

lazy_static! {
    static ref QUOTED_IDENTIFIER: Regex =
        Regex::new(r"`[^`]*`").expect("quoted identifier pattern is valid");
}

/// Backtick-quotes an identifier, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Prefixes every backticked identifier in `expression` with `alias`.
///
/// `CONCAT(`First`, ' ', `Last`)` qualified by `` `1` `` becomes
/// `CONCAT(`1`.`First`, ' ', `1`.`Last`)`.
pub fn qualify_columns(alias: &str, expression: &str) -> String {
    QUOTED_IDENTIFIER
        .replace_all(expression, |caps: &Captures| format!("{}.{}", alias, &caps[0]))
        .into_owned()
}

/// Indents every non-empty line by one tab.
pub fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("\t{}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps a multi-line nested statement in parentheses, two levels deeper.
pub fn indent_if_needed(sql: &str) -> String {
    if sql.contains('\n') {
        format!("(\n{}\n)", indent(&indent(sql)))
    } else {
        sql.to_string()
    }
}

impl ToSql for Source {
    fn to_sql(&self) -> String {
        match self {
            Source::Table(name) => quote_identifier(name),
            Source::Subquery(sql) => indent_if_needed(sql),
        }
    }
}

impl ToSql for JoinKind {
    fn to_sql(&self) -> String {
        match self {
            JoinKind::Inner => "INNER JOIN".to_string(),
            JoinKind::Left => "LEFT JOIN".to_string(),
        }
    }
}

impl ToSql for OrderDirection {
    fn to_sql(&self) -> String {
        match self {
            OrderDirection::Asc => "ASC".to_string(),
            OrderDirection::Desc => "DESC".to_string(),
        }
    }
}

impl ToSql for OrderBy {
    fn to_sql(&self) -> String {
        format!("ORDER BY {} {}\n", self.column, self.direction.to_sql())
    }
}

impl ToSql for Limit {
    fn to_sql(&self) -> String {
        format!("LIMIT {}, {}\n", self.offset, self.count)
    }
}
