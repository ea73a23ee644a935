//! Tracing subscriber that writes INFO events into [`Recorder`] tables.

use std::cell::RefCell;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Metadata, Subscriber};

use crate::table::{DynamicTable, Recorder, TypedColumn};

thread_local! {
    pub(crate) static RECORDER: RefCell<Recorder> = RefCell::default();
}

/// Visitor that appends one event's fields to a table row.
struct ColumnVisitor<'a> {
    table: &'a mut DynamicTable,
}

impl Visit for ColumnVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        let col = self
            .table
            .column_or_insert(field.name(), |n| TypedColumn::U64(vec![0; n]));
        if let TypedColumn::U64(v) = col {
            v.push(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        let col = self
            .table
            .column_or_insert(field.name(), |n| TypedColumn::I64(vec![0; n]));
        if let TypedColumn::I64(v) = col {
            v.push(value);
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        let col = self
            .table
            .column_or_insert(field.name(), |n| TypedColumn::F64(vec![f64::NAN; n]));
        if let TypedColumn::F64(v) = col {
            v.push(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        let col = self
            .table
            .column_or_insert(field.name(), |n| TypedColumn::Bool(vec![false; n]));
        if let TypedColumn::Bool(v) = col {
            v.push(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let col = self
            .table
            .column_or_insert(field.name(), |n| TypedColumn::Str(vec![String::new(); n]));
        if let TypedColumn::Str(v) = col {
            v.push(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}

/// Collects INFO-and-above events into the thread-local recorder, one table
/// per event target.
///
/// With an allow-list only the named targets are recorded, which keeps long
/// sweeps from filling memory with events nobody reads.
#[derive(Debug, Clone, Default)]
pub struct DataFrameSubscriber {
    targets: Option<Vec<String>>,
}

impl DataFrameSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record only events whose target is in `targets`.
    pub fn with_targets<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: Some(targets.into_iter().map(Into::into).collect()),
        }
    }

    fn accepts_target(&self, target: &str) -> bool {
        match &self.targets {
            Some(allowed) => allowed.iter().any(|t| t == target),
            None => true,
        }
    }
}

impl Subscriber for DataFrameSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event()
            && *metadata.level() <= tracing::Level::INFO
            && self.accepts_target(metadata.target())
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        // Spans are not tracked
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let target = event.metadata().target().to_string();

        RECORDER.with(|r| {
            let mut recorder = r.borrow_mut();
            let table = recorder.tables.entry(target).or_default();

            table.pad_columns_to_row_count();
            event.record(&mut ColumnVisitor { table: &mut *table });
            table.row_count += 1;
            // Fields this event did not carry
            table.pad_columns_to_row_count();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clear, drain};
    use tracing::subscriber::with_default;

    #[test]
    fn test_events_become_rows() {
        clear();

        with_default(DataFrameSubscriber::new(), || {
            tracing::info!(target: "gini", step = 1u64, gini = 0.31f64, phase = "measuring");
            tracing::info!(target: "gini", step = 2u64, gini = 0.33f64, phase = "measuring");
            tracing::info!(target: "gini", step = 3u64, gini = 0.35f64);
        });

        let recorder = drain();
        let table = recorder.table("gini").expect("gini table");
        assert_eq!(table.row_count, 3);
        assert_eq!(table.u64_column("step"), Some(&[1u64, 2, 3][..]));
        assert_eq!(recorder.f64_column("gini", "gini"), Some(&[0.31, 0.33, 0.35][..]));

        if let TypedColumn::Str(phases) = &table.columns["phase"] {
            assert_eq!(phases, &vec!["measuring", "measuring", ""]);
        } else {
            panic!("phase should be Str column");
        }
    }

    #[test]
    fn test_target_allow_list_and_level() {
        clear();

        with_default(DataFrameSubscriber::with_targets(["sweep"]), || {
            tracing::info!(target: "sweep", index = 0u64, mean_gini = 0.4f64);
            tracing::info!(target: "gini", step = 1u64, gini = 0.3f64);
            tracing::debug!(target: "sweep", index = 1u64, mean_gini = 0.5f64);
        });

        let recorder = drain();
        assert!(recorder.table("gini").is_none(), "gini target not allowed");
        assert_eq!(recorder.table("sweep").map(|t| t.row_count), Some(1));
    }
}
