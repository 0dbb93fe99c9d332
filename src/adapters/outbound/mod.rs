pub mod buffered_logger;
pub mod console_logger;
pub mod file_logger;
pub mod graph_planner;
pub mod http_planner;
pub mod memory_logger;
pub mod multi_logger;
pub mod path_planning_data;
pub mod road_network;
pub mod straight_line_planner;

pub use buffered_logger::*;
pub use console_logger::*;
pub use file_logger::*;
pub use graph_planner::*;
pub use http_planner::*;
pub use memory_logger::*;
pub use multi_logger::*;
pub use path_planning_data::*;
pub use road_network::*;
pub use straight_line_planner::*;
