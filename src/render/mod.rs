mod null_renderer;

pub use null_renderer::NullRenderer;

use crate::error::ChartResult;
use crate::plot::PlotSpecification;

/// Contract implemented by the external rendering engine.
///
/// Backends receive a fully compiled, deterministic `PlotSpecification` so
/// drawing code stays isolated from configuration and validation logic.
pub trait Renderer {
    fn render(&mut self, spec: &PlotSpecification) -> ChartResult<()>;
}
