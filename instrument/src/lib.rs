//! Column-oriented capture of `tracing` events.
//!
//! Every INFO-or-above event becomes one row in the table named after its
//! target; each field becomes a column, typed by the first value recorded for
//! it. Rows that omit a field get the type's default, so all columns of a
//! table stay the same length. Spans are ignored.
//!
//! ```ignore
//! // Library code:
//! tracing::info!(target: "plan_step", step = 1u64, recipe = "rust_pudding", quantity = 5u64);
//!
//! // Test:
//! instrument::install_subscriber();
//! // ... plan ...
//! let steps = instrument::drain().tables["plan_step"].to_dataframe()?;
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Level, Metadata, Subscriber};

// ============================================================================
// Storage
// ============================================================================

/// One column's values.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    U64(Vec<u64>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::U64(v) => v.len(),
            Values::I64(v) => v.len(),
            Values::F64(v) => v.len(),
            Values::Bool(v) => v.len(),
            Values::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pad_to(&mut self, rows: usize) {
        match self {
            Values::U64(v) => v.resize(rows.max(v.len()), 0),
            Values::I64(v) => v.resize(rows.max(v.len()), 0),
            Values::F64(v) => v.resize(rows.max(v.len()), 0.0),
            Values::Bool(v) => v.resize(rows.max(v.len()), false),
            Values::Str(v) => v.resize(rows.max(v.len()), String::new()),
        }
    }

    fn to_column(&self, name: &str) -> Column {
        match self {
            Values::U64(v) => Column::new(name.into(), v),
            Values::I64(v) => Column::new(name.into(), v),
            Values::F64(v) => Column::new(name.into(), v),
            Values::Bool(v) => Column::new(name.into(), v),
            Values::Str(v) => Column::new(name.into(), v),
        }
    }
}

/// A value type a column can hold.
trait Cell: Clone + Default {
    fn new_column(values: Vec<Self>) -> Values;
    fn slot(values: &mut Values) -> Option<&mut Vec<Self>>;
}

macro_rules! cell {
    ($ty:ty, $variant:ident) => {
        impl Cell for $ty {
            fn new_column(values: Vec<Self>) -> Values {
                Values::$variant(values)
            }

            fn slot(values: &mut Values) -> Option<&mut Vec<Self>> {
                match values {
                    Values::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

cell!(u64, U64);
cell!(i64, I64);
cell!(f64, F64);
cell!(bool, Bool);
cell!(String, Str);

/// Rows of one event target.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: BTreeMap<String, Values>,
    pub rows: usize,
}

impl Table {
    /// Set `name` in the row being built. A value whose type differs from
    /// the column's is dropped and the cell gets the default.
    fn push<T: Cell>(&mut self, name: &str, value: T) {
        let rows = self.rows;
        let column = self
            .columns
            .entry(name.to_string())
            .or_insert_with(|| T::new_column(vec![T::default(); rows]));
        if let Some(values) = T::slot(column) {
            if values.len() == rows {
                values.push(value);
            }
        }
    }

    fn end_row(&mut self) {
        self.rows += 1;
        for column in self.columns.values_mut() {
            column.pad_to(self.rows);
        }
    }

    pub fn column(&self, name: &str) -> Option<&Values> {
        self.columns.get(name)
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(
            self.columns
                .iter()
                .map(|(name, values)| values.to_column(name))
                .collect(),
        )
    }
}

/// All tables, keyed by event target.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    pub tables: HashMap<String, Table>,
}

impl Recorder {
    /// Tables that fail to convert are skipped.
    pub fn to_dataframes(&self) -> HashMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| Some((name.clone(), table.to_dataframe().ok()?)))
            .collect()
    }
}

thread_local! {
    static RECORDER: RefCell<Recorder> = RefCell::default();
}

// ============================================================================
// Subscriber
// ============================================================================

struct RowVisitor<'a>(&'a mut Table);

impl Visit for RowVisitor<'_> {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.push(field.name(), value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.push(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.0.push(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.push(field.name(), value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push(field.name(), format!("{value:?}"));
    }
}

/// Records events into the thread-local [`Recorder`].
pub struct TableSubscriber;

impl Subscriber for TableSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event() && *metadata.level() <= Level::INFO
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        RECORDER.with(|recorder| {
            let mut recorder = recorder.borrow_mut();
            let table = recorder
                .tables
                .entry(event.metadata().target().to_string())
                .or_default();
            event.record(&mut RowVisitor(table));
            table.end_row();
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install [`TableSubscriber`] as the global default. Later calls are no-ops.
pub fn install_subscriber() {
    let _ = tracing::subscriber::set_global_default(TableSubscriber);
}

/// Take everything recorded on this thread.
pub fn drain() -> Recorder {
    RECORDER.with(|r| std::mem::take(&mut *r.borrow_mut()))
}

pub fn clear() {
    drop(drain());
}

pub fn drain_to_dataframes() -> HashMap<String, DataFrame> {
    drain().to_dataframes()
}

// ============================================================================
// Parquet
// ============================================================================

fn io_error(error: std::io::Error) -> PolarsError {
    PolarsError::IO {
        error: error.into(),
        msg: None,
    }
}

/// Write each frame to `{dir}/{name}.parquet`.
pub fn save_parquet(dfs: &mut HashMap<String, DataFrame>, dir: &Path) -> PolarsResult<()> {
    std::fs::create_dir_all(dir).map_err(io_error)?;
    for (name, df) in dfs.iter_mut() {
        let file = std::fs::File::create(dir.join(format!("{name}.parquet"))).map_err(io_error)?;
        ParquetWriter::new(file).finish(df)?;
    }
    Ok(())
}

/// Clears recorded data on creation and writes it as parquet on drop, with
/// an empty `_ready` file marking the directory complete.
///
/// ```ignore
/// let mut rec = instrument::ScopedRecorder::new("target/runs", "default_day");
/// // ... plan ...
/// let steps = &rec.get()["plan_step"];
/// ```
pub struct ScopedRecorder {
    dir: PathBuf,
    dfs: Option<HashMap<String, DataFrame>>,
}

impl ScopedRecorder {
    /// Output goes to `{parent}/{name}` with `name` reduced to `[A-Za-z0-9_]`.
    pub fn new(parent: impl Into<PathBuf>, name: &str) -> Self {
        let name: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        clear();
        install_subscriber();
        Self {
            dir: parent.into().join(name),
            dfs: None,
        }
    }

    /// Drains on first call; later calls return the same frames.
    pub fn get(&mut self) -> &HashMap<String, DataFrame> {
        self.dfs.get_or_insert_with(drain_to_dataframes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for ScopedRecorder {
    fn drop(&mut self) {
        let mut dfs = self.dfs.take().unwrap_or_else(drain_to_dataframes);
        if dfs.is_empty() {
            return;
        }
        let written = save_parquet(&mut dfs, &self.dir)
            .map_err(|e| e.to_string())
            .and_then(|()| {
                std::fs::File::create(self.dir.join("_ready")).map_err(|e| e.to_string())
            });
        if let Err(e) = written {
            eprintln!("ScopedRecorder({}): {e}", self.dir.display());
        }
    }
}
