//! Progress reporting for long matrix decodes.
//!
//! The decoder calls a [`ProgressSink`] only when the integer percentage of
//! decoded rows changes, so a sink sees at most 100 events per decode. A
//! caller driving a UI or cooperative scheduler can yield from the sink.

/// Receives `(completed, total)` row counts during matrix decoding.
pub trait ProgressSink {
    /// Called with the number of rows decoded so far and the total.
    fn report(&mut self, completed: usize, total: usize);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize, usize),
{
    fn report(&mut self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline(always)]
    fn report(&mut self, _completed: usize, _total: usize) {}
}

/// Sink that forwards events to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&mut self, completed: usize, total: usize) {
        tracing::debug!(
            "Decoded {}/{} rows ({}%)",
            completed,
            total,
            percent(completed, total)
        );
    }
}

/// Returns `completed * 100 / total`, or 100 for an empty total.
#[must_use]
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    // u128 keeps the multiplication exact for any usize row count.
    ((completed as u128 * 100) / total as u128).min(100) as u8
}

/// Coalesces per-row progress into percentage-change events.
#[derive(Debug, Clone)]
pub struct ProgressCoalescer {
    total: usize,
    last_percent: u8,
}

impl ProgressCoalescer {
    /// Creates a coalescer for `total` rows, starting at 0%.
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            last_percent: 0,
        }
    }

    /// Records that `completed` rows are done and notifies `sink` if the
    /// percentage moved.
    #[inline]
    pub fn advance<P: ProgressSink + ?Sized>(&mut self, completed: usize, sink: &mut P) {
        let pct = percent(completed, self.total);
        if pct != self.last_percent {
            self.last_percent = pct;
            sink.report(completed, self.total);
        }
    }

    /// Returns the last reported percentage.
    #[must_use]
    pub fn last_percent(&self) -> u8 {
        self.last_percent
    }
}
