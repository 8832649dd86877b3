//! The SELECT statement builder.
//!
//! A [`Select`] accumulates table slots, projected columns and clauses in any
//! order and renders them in the fixed MySQL clause order:
//!
//! ```text
//! SELECT
//! 	<column> AS `<id>`, ...
//! FROM <source> AS <tag>
//! INNER JOIN | LEFT JOIN <source> AS <tag> ON <condition>
//! WHERE <expression>
//! ORDER BY <column> ASC | DESC
//! LIMIT <offset>, <count>
//! ```

use std::collections::HashMap;
use std::fmt;

use super::alias::TagGenerator;
use super::errors::StatementError;
use super::table::{Join, JoinCondition, JoinKind, Source, Table, TableId, TableSource};
use super::to_sql::{qualify_columns, quote_identifier};
use super::ToSql;

/// Position of a projected column; also its rendered alias.
pub type ColumnId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            OrderDirection::Asc
        } else {
            OrderDirection::Desc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub offset: String,
    pub count: String,
}

pub struct Select<'t> {
    tags: &'t dyn TagGenerator,
    tables: Vec<Table>,
    table_ids: HashMap<TableSource, TableId>,
    columns: Vec<String>,
    column_ids: HashMap<String, ColumnId>,
    filter: Option<String>,
    order_by: Option<OrderBy>,
    limit: Option<Limit>,
}

impl fmt::Debug for Select<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("tables", &self.tables)
            .field("columns", &self.columns)
            .field("filter", &self.filter)
            .field("order_by", &self.order_by)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<'t> Select<'t> {
    pub fn new(tags: &'t dyn TagGenerator) -> Self {
        Select {
            tags,
            tables: Vec::new(),
            table_ids: HashMap::new(),
            columns: Vec::new(),
            column_ids: HashMap::new(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    /// Registers the single FROM source. Always returns table id `0`.
    pub fn set_from_table(&mut self, table: Table) -> Result<TableId, StatementError> {
        if let Some(existing) = self.tables.first() {
            return Err(StatementError::MultipleFromTables(
                existing.tag().to_string(),
            ));
        }
        if matches!(table.source(), TableSource::Join(_)) {
            return Err(StatementError::JoinAsFromTable);
        }

        log::debug!("FROM {:?} AS {}", table.source(), table.tag());
        self.table_ids.insert(table.source().clone(), 0);
        self.tables.push(table);
        Ok(0)
    }

    /// Builds a descriptor for `source` and registers it as the FROM source.
    pub fn set_from(&mut self, source: impl Into<Source>) -> Result<TableId, StatementError> {
        if let Some(existing) = self.tables.first() {
            return Err(StatementError::MultipleFromTables(
                existing.tag().to_string(),
            ));
        }
        let table = Table::new(TableSource::From(source.into()), self.tags);
        self.set_from_table(table)
    }

    /// Joins `right` onto the table `left`, reusing an identical earlier join.
    ///
    /// The join is INNER only when the relationship is neither optional nor
    /// to-many; otherwise it is a LEFT JOIN.
    pub fn add_join(
        &mut self,
        left: TableId,
        right: impl Into<Source>,
        condition: JoinCondition,
        is_optional: bool,
        is_many: bool,
    ) -> Result<TableId, StatementError> {
        self.table(left)?;

        let source = TableSource::Join(Join {
            left,
            right: right.into(),
            condition,
            kind: JoinKind::from_cardinality(is_optional, is_many),
        });

        if let Some(&id) = self.table_ids.get(&source) {
            log::trace!("Reusing join slot {} for {:?}", id, source);
            return Ok(id);
        }

        let table = Table::new(source.clone(), self.tags);
        let id = self.tables.len();
        log::debug!("JOIN slot {} AS {}: {:?}", id, table.tag(), source);
        self.table_ids.insert(source, id);
        self.tables.push(table);
        Ok(id)
    }

    /// Looks up the slot holding a structurally identical descriptor.
    pub fn get_table_id(&self, table: &Table) -> Result<TableId, StatementError> {
        self.table_ids
            .get(table.source())
            .copied()
            .ok_or_else(|| StatementError::UnknownTable(format!("{:?}", table.source())))
    }

    pub fn table(&self, id: TableId) -> Result<&Table, StatementError> {
        self.tables
            .get(id)
            .ok_or_else(|| StatementError::UnknownTable(format!("table id {}", id)))
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// The rendered alias of a table slot.
    pub fn alias(&self, id: TableId) -> Result<String, StatementError> {
        Ok(quote_identifier(self.table(id)?.tag().as_str()))
    }

    /// Qualifies every quoted identifier in `expression` with the table's alias.
    pub fn qualify(&self, id: TableId, expression: &str) -> Result<String, StatementError> {
        Ok(qualify_columns(&self.alias(id)?, expression))
    }

    /// Projects an expression; projecting the same text twice yields one column.
    pub fn add_column(&mut self, expression: impl ToSql) -> ColumnId {
        let sql = expression.to_sql();
        if let Some(&id) = self.column_ids.get(&sql) {
            return id;
        }
        let id = self.columns.len();
        self.column_ids.insert(sql.clone(), id);
        self.columns.push(sql);
        id
    }

    pub fn add_column_for_table(
        &mut self,
        id: TableId,
        column: &str,
    ) -> Result<ColumnId, StatementError> {
        let qualified = self.qualify(id, column)?;
        Ok(self.add_column(qualified))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn set_where(&mut self, expression: impl ToSql) {
        if let Some(previous) = &self.filter {
            log::warn!("Replacing WHERE clause `{}`", previous);
        }
        self.filter = Some(expression.to_sql());
    }

    pub fn set_order_by(
        &mut self,
        id: TableId,
        column: &str,
        ascending: bool,
    ) -> Result<(), StatementError> {
        let column = self.qualify(id, column)?;
        if let Some(previous) = &self.order_by {
            log::warn!("Replacing ORDER BY {}", previous.column);
        }
        self.order_by = Some(OrderBy {
            column,
            direction: OrderDirection::from_ascending(ascending),
        });
        Ok(())
    }

    pub fn set_limit(&mut self, offset: impl ToSql, count: impl ToSql) {
        if self.limit.is_some() {
            log::warn!("Replacing LIMIT clause");
        }
        self.limit = Some(Limit {
            offset: offset.to_sql(),
            count: count.to_sql(),
        });
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn order_by(&self) -> Option<&OrderBy> {
        self.order_by.as_ref()
    }

    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    /// Renders the statement. Needs at least one table and one column.
    pub fn render(&self) -> Result<String, StatementError> {
        if self.tables.is_empty() {
            return Err(StatementError::InvalidStatement(
                "no FROM table".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(StatementError::InvalidStatement(
                "no columns selected".to_string(),
            ));
        }

        let mut sql = String::from("SELECT\n");
        sql.push_str(&self.render_columns());
        sql.push_str(&self.render_tables()?);
        if let Some(filter) = &self.filter {
            sql.push_str(&format!("WHERE {}\n", filter));
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(&order_by.to_sql());
        }
        if let Some(limit) = &self.limit {
            sql.push_str(&limit.to_sql());
        }

        Ok(sql.trim_end_matches('\n').to_string())
    }

    fn render_columns(&self) -> String {
        let mut sql = String::new();
        for (id, column) in self.columns.iter().enumerate() {
            sql.push('\t');
            sql.push_str(column);
            sql.push_str(" AS ");
            sql.push_str(&quote_identifier(&id.to_string()));
            if id + 1 < self.columns.len() {
                sql.push(',');
            }
            sql.push('\n');
        }
        sql
    }

    fn render_tables(&self) -> Result<String, StatementError> {
        let mut sql = String::new();
        for table in &self.tables {
            let alias = quote_identifier(table.tag().as_str());
            match table.source() {
                TableSource::From(source) => {
                    sql.push_str(&format!("FROM {} AS {}\n", source.to_sql(), alias));
                }
                TableSource::Join(join) => {
                    let left = self.alias(join.left)?;
                    sql.push_str(&format!(
                        "{} {} AS {} ON {}\n",
                        join.kind.to_sql(),
                        join.right.to_sql(),
                        alias,
                        join.condition.render(&left, &alias)
                    ));
                }
            }
        }
        Ok(sql)
    }
}
