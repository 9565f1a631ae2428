//! The in-memory table boundary.
//!
//! The byte-level mmCIF reader is an external collaborator; this module
//! defines the shape it must hand over: a named [`Dataset`] of [`Table`]s,
//! each a list of string rows under named columns. Access to an unknown
//! block or column fails with a distinct schema error rather than a generic
//! lookup failure, since it signals an incompatible input schema.

use std::collections::HashMap;
use thiserror::Error;

/// A required schema element was absent from the input tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown block '{block}'")]
    MissingBlock { block: String },
    #[error("unknown column '{column}' in block '{block}'")]
    MissingColumn { block: String, column: String },
}

/// A single table (data block category) with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Appends one row of values, in column order.
    pub fn push_row(&mut self, values: &[&str]) -> &mut Self {
        self.rows.push(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates row views in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.rows.len()).map(move |index| Row { table: self, index })
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: &str) -> Result<Vec<&str>, SchemaError> {
        let position = self.column_position(column)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(position).map(String::as_str).unwrap_or(""))
            .collect())
    }

    fn column_position(&self, column: &str) -> Result<usize, SchemaError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| SchemaError::MissingColumn {
                block: self.name.clone(),
                column: column.to_string(),
            })
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    /// The value under `column`, or a missing-column error.
    pub fn get(&self, column: &str) -> Result<&'a str, SchemaError> {
        let position = self.table.column_position(column)?;
        Ok(self.table.rows[self.index]
            .get(position)
            .map(String::as_str)
            .unwrap_or(""))
    }

    /// The value under `column` when the column exists at all.
    pub fn get_opt(&self, column: &str) -> Option<&'a str> {
        self.get(column).ok()
    }

    /// The zero-based row index, for diagnostics.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A named set of tables, one per data block category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    name: String,
    blocks: HashMap<String, Table>,
}

impl Dataset {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            blocks: HashMap::new(),
        }
    }

    /// The data block name; by convention the PDB entry id.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn insert(&mut self, table: Table) -> &mut Self {
        self.blocks.insert(table.name().to_string(), table);
        self
    }

    pub fn has_block(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    /// The table with the given name, or a missing-block error.
    pub fn block(&self, name: &str) -> Result<&Table, SchemaError> {
        self.blocks.get(name).ok_or_else(|| SchemaError::MissingBlock {
            block: name.to_string(),
        })
    }
}
