mod cache;
mod catmull_rom;
mod core;
mod frame;
mod metrics;
mod optimize;
mod path;
mod sampling;
mod strategy;
mod topology;

pub use cache::{INCREMENTAL_MIN_POINTS, LengthCacheStats, SegmentLengthCache};
pub use catmull_rom::{CatmullRomSegment, catmull_rom_point, sub_step_parameters};
pub use core::{BBox, Point3, Tolerance, Transform, Vec3};
pub use frame::{CoordinateFrame, LocalFrame};
pub use metrics::{PathMetrics, PathTimingReport, TimingBucket};
pub use optimize::{
    AngleOptimization, AngleOptimizerOptions, MIN_CORNER_RESOLUTION, corner_estimate,
    corner_resolution, search_angle_resolution,
};
pub use path::{MAX_RESOLUTION, MIN_RESOLUTION, Path, PathError, PathOptions, clamp_resolution};
pub use sampling::max_turn_angle_at;
pub use strategy::{SegmentLengthStrategy, spline_segment};
pub use topology::{
    drawable_raw_indices, raw_segment_index, segment_count, segment_shift, wrap_index,
    wrapped_window,
};
