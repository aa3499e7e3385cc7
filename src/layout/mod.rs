//! Geometry for the two chart surfaces: the Gantt timeline and the network
//! (dependency graph) view.

pub mod force;
pub mod routing;
pub mod timeline;

pub use force::{initial_positions, layout, relax, NodePosition};
pub use routing::{
    anchor_points, is_highlighted, path_hit, route_dependencies, route_dependency, route_path,
    AnchorSide, Anchors, Arrowhead, DependencyPath, Focus, PathShape, PathStyle, RoutedPath,
};
pub use timeline::{
    bar_geometry, bar_rect, compute_date_range, day_width, gantt_geometry, header_cells,
    timeline_columns, Columns, DateRange, Geometry, Granularity, HeaderCell, HeaderUnit,
    RowMetrics, Timeline, TimelineColumn,
};
