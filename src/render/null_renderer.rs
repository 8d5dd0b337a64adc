use crate::error::ChartResult;
use crate::plot::{PlotSpecification, Trace};
use crate::render::Renderer;

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates the specification so tests catch misaligned series
/// before a real backend sees them.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_trace_count: usize,
    pub last_point_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, spec: &PlotSpecification) -> ChartResult<()> {
        spec.validate()?;
        self.render_count += 1;
        self.last_trace_count = spec.traces.len();
        self.last_point_count = spec
            .traces
            .iter()
            .map(|trace| match trace {
                Trace::Bar(t) | Trace::Scatter(t) => t.y.len(),
                Trace::Pie(t) => t.values.len(),
                Trace::Scatter3d(t) => t.z.len(),
                Trace::Surface(t) => t.z.iter().map(Vec::len).sum(),
            })
            .sum();
        Ok(())
    }
}
