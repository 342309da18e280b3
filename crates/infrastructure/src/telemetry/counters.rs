//! Per-payload counter instruments
//!
//! Instruments are created lazily on first use and cached by name, so each
//! payload maps to exactly one counter for the lifetime of the process.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use domain::CounterName;
use opentelemetry::metrics::{Counter, Meter};
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Maximum instrument name length accepted by OpenTelemetry
const MAX_INSTRUMENT_NAME_LEN: usize = 255;

struct CounterHandle {
    counter: Counter<u64>,
    total: AtomicU64,
}

/// Lazily created `u64` counters keyed by instrument name
pub struct CounterRegistry {
    meter: Meter,
    counters: RwLock<HashMap<String, Arc<CounterHandle>>>,
}

impl fmt::Debug for CounterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterRegistry")
            .field("counters", &self.len())
            .finish_non_exhaustive()
    }
}

impl CounterRegistry {
    /// Create a registry creating its instruments from `meter`
    pub fn new(meter: Meter) -> Self {
        Self {
            meter,
            counters: RwLock::new(HashMap::new()),
        }
    }

    /// Add one to the counter `name`, creating it on first use
    ///
    /// Names the instrument grammar rejects are logged and skipped, so a
    /// payload such as `hello world` is never counted. Other OpenTelemetry
    /// SDKs hand back a usable instrument alongside the validation error and
    /// would record it; the Rust SDK returns a no-op instrument instead.
    /// Returns whether the increment was recorded.
    pub fn increment(&self, name: &CounterName) -> bool {
        let name = name.as_str();
        if let Err(reason) = validate_instrument_name(name) {
            warn!(counter = %name, reason, "Skipping counter with invalid instrument name");
            return false;
        }

        let handle = self.get_or_create(name);
        handle.counter.add(1, &[]);
        handle.total.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn get_or_create(&self, name: &str) -> Arc<CounterHandle> {
        if let Some(handle) = self.counters.read().get(name) {
            return Arc::clone(handle);
        }

        let mut counters = self.counters.write();
        let handle = counters.entry(name.to_string()).or_insert_with(|| {
            debug!(counter = %name, "Creating counter instrument");
            Arc::new(CounterHandle {
                counter: self.meter.u64_counter(name.to_string()).build(),
                total: AtomicU64::new(0),
            })
        });
        Arc::clone(handle)
    }

    /// Total recorded on counter `name` by this process
    pub fn value(&self, name: &str) -> Option<u64> {
        self.counters
            .read()
            .get(name)
            .map(|handle| handle.total.load(Ordering::Relaxed))
    }

    /// Number of instruments created
    pub fn len(&self) -> usize {
        self.counters.read().len()
    }

    /// Whether no instrument has been created yet
    pub fn is_empty(&self) -> bool {
        self.counters.read().is_empty()
    }

    /// Names of all created instruments, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.counters.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

/// Check a name against the OpenTelemetry instrument name grammar
///
/// A name starts with an ASCII letter, continues with ASCII alphanumerics,
/// `_`, `.`, `-` or `/`, and is at most 255 characters long.
pub fn validate_instrument_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }
    if name.len() > MAX_INSTRUMENT_NAME_LEN {
        return Err("name is longer than 255 characters");
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err("name must start with an ASCII letter");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '/'))
    {
        return Err("name contains characters outside [A-Za-z0-9_.-/]");
    }
    Ok(())
}
