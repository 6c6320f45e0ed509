/*!

A generic, in-memory table over rows of any shape.

Columns are not part of the row type. A [`Schema`] associates column names with plain functions
that extract a [`Cell`] from a row, so the same table engine serves every listable resource:

```
use eksinspect_model::table::{Cell, CollectionTable, Schema};

#[derive(Clone)]
struct Pool {
    name: String,
    size: i64,
}

let schema = Schema::new()
    .column("names", |pool: &Pool| Cell::from(pool.name.as_str()))
    .column("sizes", |pool: &Pool| Cell::from(pool.size));
let table = CollectionTable::new(
    vec![
        Pool { name: "a".into(), size: 1 },
        Pool { name: "b".into(), size: 3 },
    ],
    schema,
);
let big = table.where_fn(|pool| pool.size > 2);
assert_eq!(big.column("names").unwrap(), vec![Cell::from("b")]);
```

!*/

use crate::error::{self, Result};
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tabled::object::Segment;
use tabled::{Alignment, Modify, Style, Table, Tabled, Width};

/// A single projected value.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl Cell {
    /// Whether the cell holds `expected`. A list matches when it contains the expected text.
    pub fn matches(&self, expected: &Cell) -> bool {
        match (self, expected) {
            (Cell::List(items), Cell::Text(text)) => items.contains(text),
            _ => self == expected,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(value) => write!(f, "{}", value),
            Cell::Int(value) => write!(f, "{}", value),
            Cell::Text(value) => write!(f, "{}", value),
            Cell::List(values) => write!(f, "{}", values.join(",")),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&String> for Cell {
    fn from(value: &String) -> Self {
        Cell::Text(value.clone())
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Int(value.into())
    }
}

impl From<Vec<String>> for Cell {
    fn from(values: Vec<String>) -> Self {
        Cell::List(values)
    }
}

impl<T> From<Option<T>> for Cell
where
    T: Into<Cell>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Extracts one column's value from a row.
pub type Extractor<R> = fn(&R) -> Cell;

/// The named columns of a table, in registration order.
pub struct Schema<R> {
    columns: Vec<(String, Extractor<R>)>,
}

impl<R> Schema<R> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Register `name`. Registering a name again replaces its extractor.
    pub fn column<S>(mut self, name: S, extractor: Extractor<R>) -> Self
    where
        S: Into<String>,
    {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some(column) => column.1 = extractor,
            None => self.columns.push((name, extractor)),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(existing, _)| existing == name)
    }

    fn extractor(&self, name: &str) -> Result<Extractor<R>> {
        match self.columns.iter().find(|(existing, _)| existing == name) {
            Some((_, extractor)) => Ok(*extractor),
            None => error::UnknownColumnSnafu {
                column: name,
                known: self.names().map(str::to_string).collect::<Vec<_>>(),
            }
            .fail(),
        }
    }
}

impl<R> Default for Schema<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Schema<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> std::fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// An ordered collection of rows with named column projections. Insertion order is the only
/// order; filtering returns a new table and leaves this one untouched.
#[derive(Clone, Debug)]
pub struct CollectionTable<R> {
    rows: Vec<R>,
    schema: Arc<Schema<R>>,
}

impl<R> CollectionTable<R> {
    pub fn new(rows: Vec<R>, schema: Schema<R>) -> Self {
        Self::with_schema(rows, Arc::new(schema))
    }

    /// Build a table that shares an existing schema.
    pub fn with_schema(rows: Vec<R>, schema: Arc<Schema<R>>) -> Self {
        Self { rows, schema }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the table has any row.
    pub fn exists(&self) -> bool {
        !self.is_empty()
    }

    pub fn schema(&self) -> &Arc<Schema<R>> {
        &self.schema
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.names().map(str::to_string).collect()
    }

    /// The values of column `name`, one per row, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<Cell>> {
        let extractor = self.schema.extractor(name)?;
        Ok(self.rows.iter().map(extractor).collect())
    }

    /// The text values of column `name`. Cells that are not text are skipped.
    pub fn strings(&self, name: &str) -> Result<Vec<String>> {
        Ok(self
            .column(name)?
            .iter()
            .filter_map(|cell| cell.as_str().map(str::to_string))
            .collect())
    }
}

impl<R> CollectionTable<R>
where
    R: Clone,
{
    /// The rows for which `predicate` holds.
    pub fn where_fn<F>(&self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool,
    {
        Self {
            rows: self.rows.iter().filter(|row| predicate(row)).cloned().collect(),
            schema: Arc::clone(&self.schema),
        }
    }

    /// The rows whose `column` value satisfies `predicate`.
    pub fn where_column<F>(&self, column: &str, predicate: F) -> Result<Self>
    where
        F: Fn(&Cell) -> bool,
    {
        let extractor = self.schema.extractor(column)?;
        Ok(self.where_fn(|row| predicate(&extractor(row))))
    }

    /// The rows whose `column` value matches `value`.
    pub fn where_eq<V>(&self, column: &str, value: V) -> Result<Self>
    where
        V: Into<Cell>,
    {
        let expected = value.into();
        self.where_column(column, |cell| cell.matches(&expected))
    }

    /// The rows whose `column` value matches any of `values`.
    pub fn where_in<I, V>(&self, column: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        let expected: Vec<Cell> = values.into_iter().map(Into::into).collect();
        self.where_column(column, |cell| {
            expected.iter().any(|expected| cell.matches(expected))
        })
    }
}

impl<R> CollectionTable<R>
where
    R: Tabled + Clone,
{
    /// Render the rows as a plain text table.
    pub fn render(&self) -> String {
        self.table().to_string()
    }

    /// Render the rows as a plain text table exactly `width` characters wide.
    pub fn render_width(&self, width: usize) -> String {
        let mut table = self.table();
        table
            .with(Width::truncate(width))
            .with(Width::increase(width));
        table.to_string()
    }

    fn table(&self) -> Table {
        let mut table = Table::new(self.rows.clone());
        table
            .with(Style::blank())
            .with(Modify::new(Segment::all()).with(Alignment::left()));
        table
    }
}

impl<'a, R> IntoIterator for &'a CollectionTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
