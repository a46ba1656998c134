//! Span timing for group maintenance and consistency checks.
//!
//! With the `tracing` feature enabled, the collections open an `info_span!`
//! around each bulk operation and [`init_tracing`] installs a layer that sums
//! the time spent per span name. Without the feature every entry point is a
//! no-op and `info_span!` expands to a zero-sized placeholder.

#[cfg(feature = "tracing")]
mod enabled {
    use std::{
        cell::{Cell, RefCell},
        collections::{BTreeMap, HashMap},
        sync::Once,
        time::{Duration, Instant},
    };

    use tracing_subscriber::{
        Layer, Registry,
        layer::{Context, SubscriberExt},
        registry::LookupSpan,
        util::SubscriberInitExt,
    };

    type ScopeTotals = BTreeMap<&'static str, (Duration, usize)>;

    thread_local! {
        static TIMING_TOTALS: RefCell<HashMap<TimingScope, ScopeTotals>> =
            RefCell::new(HashMap::new());
        static CURRENT_SCOPE: Cell<TimingScope> = const { Cell::new(TimingScope::Maintenance) };
    }

    /// Bucket that closed spans are attributed to.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub enum TimingScope {
        /// Adding, removing and querying group membership.
        Maintenance,
        /// Full-structure consistency checks.
        Validation,
    }

    /// Restores the previous timing scope when dropped.
    pub struct TimingScopeGuard {
        previous: TimingScope,
    }

    impl Drop for TimingScopeGuard {
        fn drop(&mut self) {
            CURRENT_SCOPE.with(|current| current.set(self.previous));
        }
    }

    pub fn set_timing_scope(scope: TimingScope) -> TimingScopeGuard {
        let previous = CURRENT_SCOPE.with(|current| current.replace(scope));
        TimingScopeGuard { previous }
    }

    struct SpanTimer;

    impl<S> Layer<S> for SpanTimer
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(
            &self,
            _attrs: &tracing::span::Attributes<'_>,
            id: &tracing::Id,
            ctx: Context<'_, S>,
        ) {
            if let Some(span) = ctx.span(id) {
                span.extensions_mut().insert(Instant::now());
            }
        }

        fn on_close(&self, id: tracing::Id, ctx: Context<'_, S>) {
            let Some(span) = ctx.span(&id) else {
                return;
            };
            let Some(elapsed) = span.extensions().get::<Instant>().map(Instant::elapsed) else {
                return;
            };
            let name = span.metadata().name();
            let scope = CURRENT_SCOPE.with(Cell::get);
            TIMING_TOTALS.with(|totals| {
                let mut totals = totals.borrow_mut();
                let entry = totals
                    .entry(scope)
                    .or_default()
                    .entry(name)
                    .or_insert((Duration::ZERO, 0));
                entry.0 += elapsed;
                entry.1 += 1;
            });
        }
    }

    /// Installs the timing layer as the global subscriber. Later calls, and
    /// calls after another subscriber was installed, do nothing.
    pub fn init_tracing() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = Registry::default().with(SpanTimer).try_init();
        });
    }

    /// Number of closed spans named `name` recorded on this thread.
    pub fn span_count(scope: TimingScope, name: &str) -> usize {
        TIMING_TOTALS.with(|totals| {
            totals
                .borrow()
                .get(&scope)
                .and_then(|entries| entries.get(name))
                .map_or(0, |(_, count)| *count)
        })
    }

    #[doc(hidden)]
    pub fn dump_method_timings() {
        for scope in [TimingScope::Maintenance, TimingScope::Validation] {
            TIMING_TOTALS.with(|totals| {
                let totals = totals.borrow();
                eprintln!("{scope:?} timings (desc):");
                let Some(entries) = totals.get(&scope) else {
                    return;
                };
                let mut entries: Vec<_> = entries.iter().collect();
                entries.sort_by(|a, b| b.1.0.cmp(&a.1.0));
                for (name, (duration, count)) in entries {
                    eprintln!("  {name}: {duration:?} ({count}x)");
                }
            });
        }
    }

    #[doc(hidden)]
    pub fn reset_method_timings() {
        init_tracing();
        TIMING_TOTALS.with(|totals| totals.borrow_mut().clear());
    }

    pub use tracing::info_span;
}

#[cfg(not(feature = "tracing"))]
mod disabled {
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub enum TimingScope {
        Maintenance,
        Validation,
    }

    pub struct TimingScopeGuard;

    pub fn set_timing_scope(_scope: TimingScope) -> TimingScopeGuard {
        TimingScopeGuard
    }

    pub fn init_tracing() {}

    pub fn span_count(_scope: TimingScope, _name: &str) -> usize {
        0
    }

    #[doc(hidden)]
    pub fn dump_method_timings() {}

    #[doc(hidden)]
    pub fn reset_method_timings() {}

    #[macro_export]
    macro_rules! info_span {
        ($name:expr) => {{ $crate::tracing_support::NoOpSpan }};
        ($name:expr, $($fields:tt)*) => {{ $crate::tracing_support::NoOpSpan }};
    }

    pub use info_span;

    pub struct NoOpSpan;

    impl NoOpSpan {
        pub fn entered(self) -> NoOpSpanGuard {
            NoOpSpanGuard
        }
    }

    pub struct NoOpSpanGuard;
}

#[cfg(feature = "tracing")]
pub use enabled::*;

#[cfg(not(feature = "tracing"))]
pub use disabled::*;
