//! Instrumentation for collecting simulation data into column-oriented storage.
//!
//! Uses the `tracing` crate with a custom subscriber that dynamically builds
//! columns from event fields. Each event target becomes a table and the
//! schema emerges from the recorded events.
//!
//! # Usage
//!
//! ```ignore
//! // In simulation code:
//! tracing::info!(target: "gini", step, return_on_capital, gini);
//!
//! // In test:
//! instrument::install_subscriber();
//! // ... run simulation ...
//! let recorder = instrument::drain();
//! let trace = recorder.f64_column("gini", "gini");
//! ```

use tracing::Subscriber;

mod export;
mod subscriber;
mod table;

pub use export::{ScopedRecorder, drain_to_dataframes, save_csv, save_parquet};
pub use subscriber::DataFrameSubscriber;
pub use table::{DynamicTable, Recorder, TypedColumn};

use subscriber::RECORDER;

/// Install a [`DataFrameSubscriber`] recording every target as the global
/// default. Only the first call in a process takes effect.
pub fn install_subscriber() {
    install_global(DataFrameSubscriber::new());
}

/// Install `subscriber` as the global default, ignoring the error when one
/// is already set.
pub fn install_global(subscriber: impl Subscriber + Send + Sync + 'static) {
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Drain all recorded data from the thread-local recorder.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

/// Clear all recorded data without returning it.
pub fn clear() {
    RECORDER.with(|r| *r.borrow_mut() = Recorder::default());
}
