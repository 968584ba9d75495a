//! Region effects: measurements, blur, highlights and color sampling.
//!
//! The geometry and pixel math here is pure; the draw helpers only talk to
//! the surface through [`RasterSurface`](pixnote_raster::RasterSurface).

pub mod blur;
pub mod highlight;
pub mod measurement;
pub mod sample;

pub use blur::{BlurRegion, box_blur, box_blur_pass, box_blur_until};
pub use highlight::HighlightRegion;
pub use measurement::{MeasurementResult, MeasurementUnit, segment_geometry};
