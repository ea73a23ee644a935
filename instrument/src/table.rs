//! Column-oriented tables built from recorded events.

use std::collections::HashMap;

/// A column of typed values.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedColumn {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl TypedColumn {
    pub fn len(&self) -> usize {
        match self {
            TypedColumn::U64(v) => v.len(),
            TypedColumn::I64(v) => v.len(),
            TypedColumn::F64(v) => v.len(),
            TypedColumn::Bool(v) => v.len(),
            TypedColumn::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pad_to(&mut self, rows: usize) {
        let padding = rows.saturating_sub(self.len());
        if padding == 0 {
            return;
        }
        match self {
            TypedColumn::U64(v) => v.extend(std::iter::repeat_n(0, padding)),
            TypedColumn::I64(v) => v.extend(std::iter::repeat_n(0, padding)),
            TypedColumn::F64(v) => v.extend(std::iter::repeat_n(f64::NAN, padding)),
            TypedColumn::Bool(v) => v.extend(std::iter::repeat_n(false, padding)),
            TypedColumn::Str(v) => v.extend(std::iter::repeat_n(String::new(), padding)),
        }
    }
}

/// One table per tracing target. Columns appear in the order their field
/// was first seen.
#[derive(Debug, Clone, Default)]
pub struct DynamicTable {
    pub columns: HashMap<String, TypedColumn>,
    pub column_order: Vec<String>,
    pub row_count: usize,
}

impl DynamicTable {
    /// Bring every column up to `row_count`. Missing floats pad with NaN so
    /// an absent measurement never reads as a real zero.
    pub(crate) fn pad_columns_to_row_count(&mut self) {
        let rows = self.row_count;
        for col in self.columns.values_mut() {
            col.pad_to(rows);
        }
    }

    /// Column for `name`, created with `make(row_count)` on first sight.
    pub(crate) fn column_or_insert(
        &mut self,
        name: &str,
        make: impl FnOnce(usize) -> TypedColumn,
    ) -> &mut TypedColumn {
        let rows = self.row_count;
        let order = &mut self.column_order;
        self.columns.entry(name.to_string()).or_insert_with(|| {
            order.push(name.to_string());
            make(rows)
        })
    }

    /// Float values of `name`, if it exists and holds floats.
    pub fn f64_column(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name)? {
            TypedColumn::F64(v) => Some(v),
            _ => None,
        }
    }

    /// Integer values of `name`, if it exists and holds unsigned integers.
    pub fn u64_column(&self, name: &str) -> Option<&[u64]> {
        match self.columns.get(name)? {
            TypedColumn::U64(v) => Some(v),
            _ => None,
        }
    }
}

/// Collection of tables, keyed by tracing target.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub tables: HashMap<String, DynamicTable>,
}

impl Recorder {
    pub fn table(&self, target: &str) -> Option<&DynamicTable> {
        self.tables.get(target)
    }

    /// Shorthand for `table(target)?.f64_column(field)`.
    pub fn f64_column(&self, target: &str, field: &str) -> Option<&[f64]> {
        self.table(target)?.f64_column(field)
    }
}
