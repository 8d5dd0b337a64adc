mod compiler;
mod spec;
mod surface;

pub use compiler::{DerivedSeries, PlotCompiler};
pub use spec::{
    AxisLayout, CartesianTrace, FontLayout, Layout, LegendLayout, LineStyle, Marker, PieMarker,
    PieTrace, PlotSpecification, PointCloudTrace, SurfaceTrace, TitleLayout, Trace, TraceMode,
};
pub use surface::{GridKey, SurfaceGrid, build_surface_grid};
