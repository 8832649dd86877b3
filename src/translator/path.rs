use crate::request::ast::PropertyPath;
use crate::schema::{Binding, ValueType};
use crate::statement::TableId;

use super::errors::TranslatorError;
use super::Compilation;

/// The table slot and entity that the current array element lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub table: TableId,
    pub entity: String,
    /// The path segment that named this element, e.g. `Pets`.
    pub label: String,
}

/// Where a property path ends up.
#[derive(Debug, Clone, PartialEq)]
pub enum PathTarget {
    /// A bare collection: its rows are the elements.
    Collection(Cursor),
    /// A leaf value on the table of `cursor`; `column` is unqualified.
    Value {
        cursor: Cursor,
        column: String,
        value_type: ValueType,
    },
}

impl Compilation<'_, '_> {
    /// Walks `path`, registering FROM/JOIN slots for every relation hop.
    ///
    /// With no `start` the path begins at the root scope. Otherwise it is
    /// relative to that element and may be prefixed with the element's label.
    pub(super) fn resolve_path(
        &mut self,
        path: &PropertyPath,
        start: Option<&Cursor>,
    ) -> Result<PathTarget, TranslatorError> {
        let segments = self.strip_element_label(&path.segments, start);
        if segments.is_empty() {
            return Err(TranslatorError::UnsupportedExpression(format!(
                "empty property path `{}`",
                path
            )));
        }

        let mut cursor = start.cloned();
        for (i, segment) in segments.iter().enumerate() {
            let is_last = i + 1 == segments.len();
            let context = cursor.as_ref().map(|c| c.entity.as_str());
            let binding = self.schema.resolve(context, segment)?;
            log::trace!("{} binds to {:?}", segment, binding);

            match binding {
                Binding::Relation {
                    entity,
                    table,
                    join,
                    is_optional,
                    is_many,
                } => {
                    let id = match (&cursor, join) {
                        (None, _) => self.select.set_from(table)?,
                        (Some(left), Some(join)) => {
                            let id = self
                                .select
                                .add_join(left.table, table, join, is_optional, is_many)?;
                            if is_many && !self.to_many.contains(&id) {
                                self.to_many.push(id);
                            }
                            id
                        }
                        (Some(_), None) => {
                            return Err(TranslatorError::UnsupportedExpression(format!(
                                "root collection '{}' cannot be reached from `{}`",
                                segment, path
                            )))
                        }
                    };
                    cursor = Some(Cursor {
                        table: id,
                        entity,
                        label: segment.clone(),
                    });
                }
                Binding::Value {
                    column, value_type, ..
                } => {
                    let Some(owner) = cursor else {
                        return Err(TranslatorError::UnsupportedExpression(format!(
                            "'{}' is not a collection",
                            segment
                        )));
                    };
                    if !is_last {
                        return Err(TranslatorError::UnsupportedExpression(format!(
                            "'{}' in `{}` is a value and has no properties",
                            segment, path
                        )));
                    }
                    return Ok(PathTarget::Value {
                        cursor: owner,
                        column,
                        value_type,
                    });
                }
            }
        }

        cursor.map(PathTarget::Collection).ok_or_else(|| {
            TranslatorError::UnsupportedExpression(format!("`{}` names no collection", path))
        })
    }

    /// Drops a leading `Pets` from `Pets.age` when the element is a `Pets` row,
    /// unless the entity itself has a property of that name.
    fn strip_element_label<'p>(
        &self,
        segments: &'p [String],
        start: Option<&Cursor>,
    ) -> &'p [String] {
        match (start, segments.split_first()) {
            (Some(cursor), Some((first, rest)))
                if !rest.is_empty()
                    && *first == cursor.label
                    && self.schema.resolve(Some(&cursor.entity), first).is_err() =>
            {
                rest
            }
            _ => segments,
        }
    }
}
