use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use homedata_api_types::{AxisConfig, Selection};
use log::{debug, error, info};

use crate::colors::ColorResolver;
use crate::dataset::build_series;
use crate::export::ChartTable;
use crate::fetcher::{fetch_all, TimeSeriesSource};
use crate::renderer::{ChartInstance, ChartRenderer, ChartSurface, RenderOutcome, SvgSurface};
use crate::selection::SelectionSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A filter group had nothing picked, the chart was left alone.
    Skipped,
    /// A newer update started while this one was waiting on the network.
    Stale,
    /// Nothing in the responses could be plotted.
    Empty,
    Rendered(RenderOutcome),
    /// Drawing failed. The previous chart is kept.
    Failed,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The rental trends dashboard: fetches the series for a selection and keeps
/// a single chart up to date with them.
pub struct Dashboard<S, C = SvgSurface> {
    source: S,
    generation: AtomicU64,
    colors: Mutex<ColorResolver>,
    renderer: Mutex<ChartRenderer<C>>,
}

impl<S, C> Dashboard<S, C>
where
    S: TimeSeriesSource,
    C: ChartSurface,
{
    pub fn new(source: S, surface: C) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
            colors: Mutex::new(ColorResolver::new()),
            renderer: Mutex::new(ChartRenderer::new(surface)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn update(&self, controls: &impl SelectionSource) -> UpdateOutcome {
        self.update_with(controls.read_selections()).await
    }

    /// Runs one fetch, build and render cycle. Errors are logged here and
    /// never returned.
    pub async fn update_with(&self, selection: Selection) -> UpdateOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !selection.is_complete() {
            debug!("update {generation} skipped, selection is incomplete");
            return UpdateOutcome::Skipped;
        }
        let fetched = fetch_all(&self.source, &selection).await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("update {generation} is stale");
            return UpdateOutcome::Stale;
        }
        let built = build_series(
            &fetched,
            selection.seasonal_mode,
            selection.use_secondary_axis,
            &mut lock(&self.colors),
        );
        let Some(built) = built else {
            info!("update {generation} produced no series");
            return UpdateOutcome::Empty;
        };
        let axes = AxisConfig::for_series(&built.series, selection.use_secondary_axis);
        let mut renderer = lock(&self.renderer);
        // checked again under the lock so an older cycle can't draw over a newer one
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("update {generation} is stale");
            return UpdateOutcome::Stale;
        }
        match renderer.render(built.series, built.labels, axes) {
            Ok(outcome) => UpdateOutcome::Rendered(outcome),
            Err(e) => {
                error!("update {generation} failed to render: {e:?}");
                UpdateOutcome::Failed
            }
        }
    }

    /// Data behind the current chart, if one has been drawn.
    pub fn export_table(&self) -> Option<ChartTable> {
        lock(&self.renderer)
            .chart()
            .map(|chart| ChartTable::from_chart(chart.config()))
    }

    pub fn with_renderer<R>(&self, f: impl FnOnce(&ChartRenderer<C>) -> R) -> R {
        f(&lock(&self.renderer))
    }

    /// Tears down the chart. The next successful update creates a new one.
    pub fn unmount(&self) -> Option<ChartInstance> {
        lock(&self.renderer).destroy()
    }
}
