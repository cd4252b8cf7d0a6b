use homedata_api_types::{AxisConfig, ChartConfig, ChartSeries};
use homedata_charts::{render_svg, ChartOptions};
use log::info;

/// Something a chart configuration can be drawn onto.
pub trait ChartSurface {
    fn draw(&mut self, config: &ChartConfig) -> anyhow::Result<()>;
}

/// Draws the chart into an in-memory SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    size: (u32, u32),
    options: ChartOptions,
    svg: Option<String>,
}

impl SvgSurface {
    pub const DEFAULT_SIZE: (u32, u32) = (1200, 600);

    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            options: ChartOptions::default(),
            svg: None,
        }
    }

    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// The most recently drawn document.
    pub fn svg(&self) -> Option<&str> {
        self.svg.as_deref()
    }
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl ChartSurface for SvgSurface {
    fn draw(&mut self, config: &ChartConfig) -> anyhow::Result<()> {
        self.svg = Some(render_svg(config, &self.options, self.size)?);
        Ok(())
    }
}

/// The live chart and how many times it has been drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    config: ChartConfig,
    draws: usize,
}

impl ChartInstance {
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn draws(&self) -> usize {
        self.draws
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Created,
    Updated,
}

/// Owns the single chart instance and the surface it is drawn on.
#[derive(Debug)]
pub struct ChartRenderer<S> {
    surface: S,
    chart: Option<ChartInstance>,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            chart: None,
        }
    }

    /// Creates the chart on first use, afterwards swaps the data of the
    /// existing chart and redraws it. A failed draw keeps the previous data.
    pub fn render(
        &mut self,
        series: Vec<ChartSeries>,
        labels: Vec<String>,
        axes: AxisConfig,
    ) -> anyhow::Result<RenderOutcome> {
        let config = ChartConfig::line(labels, series, axes);
        self.surface.draw(&config)?;
        match &mut self.chart {
            Some(chart) => {
                chart.config = config;
                chart.draws += 1;
                info!("updated chart, draw #{}", chart.draws);
                Ok(RenderOutcome::Updated)
            }
            None => {
                info!("created chart with {} series", config.series.len());
                self.chart = Some(ChartInstance { config, draws: 1 });
                Ok(RenderOutcome::Created)
            }
        }
    }

    pub fn chart(&self) -> Option<&ChartInstance> {
        self.chart.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn destroy(&mut self) -> Option<ChartInstance> {
        self.chart.take()
    }
}
