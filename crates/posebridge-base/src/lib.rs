pub mod logging;
pub mod vec2;
pub mod vec3;

pub use logging::{init_file_logger, init_stdout_logger, max_level, FileLogger, StdoutLogger};
pub use vec2::Vec2;
pub use vec3::Vec3;

// Re-export log crate so downstream crates can use posebridge_base::log::*
pub use log;
