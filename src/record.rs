//! Mapping Cypher result rows onto caller-defined record types.
//!
//! A record type declares which column feeds which field through a
//! [`ColumnMapping`]. Decoding resolves each binding's column position once
//! per result, then assigns fields row by row straight from the positional
//! values.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::cypher::RawResult;
use crate::error::{NeoError, Result};

type Assign<R> = Box<dyn Fn(&mut R, Value) -> serde_json::Result<()> + Send + Sync>;

/// One `field <- column` association.
struct FieldBinding<R> {
    field: &'static str,
    column: String,
    assign: Assign<R>,
}

/// Table of field bindings for a record type `R`.
///
/// ```
/// use neocypher::{ColumnMapping, Record};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     id: i64,
///     name: String,
/// }
///
/// impl Record for Person {
///     fn mapping() -> ColumnMapping<Self> {
///         ColumnMapping::new()
///             .field("id", "id(n)", |p: &mut Person, v| p.id = v)
///             .field("name", "n.name", |p: &mut Person, v| p.name = v)
///     }
/// }
/// ```
pub struct ColumnMapping<R> {
    bindings: Vec<FieldBinding<R>>,
}

impl<R: 'static> ColumnMapping<R> {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Binds `field` to `column`. The column's value is deserialized as `T`
    /// and handed to `set`.
    pub fn field<T, F>(mut self, field: &'static str, column: impl Into<String>, set: F) -> Self
    where
        T: DeserializeOwned + 'static,
        F: Fn(&mut R, T) + Send + Sync + 'static,
    {
        let assign: Assign<R> = Box::new(move |record, value| {
            let decoded = if value.is_null() {
                // A null leaves the field untouched unless T can represent it.
                match serde_json::from_value::<T>(Value::Null) {
                    Ok(v) => v,
                    Err(_) => return Ok(()),
                }
            } else {
                serde_json::from_value::<T>(value)?
            };
            set(record, decoded);
            Ok(())
        });

        self.bindings.push(FieldBinding {
            field,
            column: column.into(),
            assign,
        });
        self
    }

    /// Returns the column bound to `field`.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.field == field)
            .map(|b| b.column.as_str())
    }

    /// Iterates over `(field, column)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.bindings.iter().map(|b| (b.field, b.column.as_str()))
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no field is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Decodes every row of `result` into a fresh `R`.
    ///
    /// Columns without a binding are ignored; bindings whose column is not in
    /// the result leave their field at its default.
    pub fn decode(&self, result: &RawResult) -> Result<Vec<R>>
    where
        R: Default,
    {
        let columns = result.columns();
        let positions: Vec<Option<usize>> = self
            .bindings
            .iter()
            .map(|b| columns.iter().position(|c| *c == b.column))
            .collect();

        let mut records = Vec::with_capacity(result.len());
        for (row_num, row) in result.rows().iter().enumerate() {
            if row.len() != columns.len() {
                return Err(NeoError::decode(format!(
                    "row {} has {} values, expected {}",
                    row_num,
                    row.len(),
                    columns.len()
                )));
            }

            let mut record = R::default();
            for (binding, position) in self.bindings.iter().zip(&positions) {
                let Some(pos) = *position else { continue };
                (binding.assign)(&mut record, row[pos].clone()).map_err(|e| {
                    NeoError::decode(format!(
                        "row {}, column '{}' into field '{}': {}",
                        row_num, binding.column, binding.field, e
                    ))
                })?;
            }
            records.push(record);
        }

        Ok(records)
    }
}

impl<R: 'static> Default for ColumnMapping<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for ColumnMapping<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.bindings.iter().map(|b| (b.field, &b.column)))
            .finish()
    }
}

/// A type that Cypher rows can be decoded into.
pub trait Record: Default + Sized + 'static {
    /// Returns the field-to-column table for this type.
    fn mapping() -> ColumnMapping<Self>;
}

/// Somewhere a query can deposit its decoded rows.
///
/// Implemented for `Vec<R>` of any [`Record`]; the vector's contents are
/// replaced, and left untouched if decoding fails.
pub trait Destination: Send {
    fn fill(&mut self, result: &RawResult) -> Result<()>;
}

impl<R: Record + Send> Destination for Vec<R> {
    fn fill(&mut self, result: &RawResult) -> Result<()> {
        *self = R::mapping().decode(result)?;
        Ok(())
    }
}
