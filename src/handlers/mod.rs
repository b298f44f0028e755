pub mod echo;
pub mod start;

pub use echo::EchoHandler;
pub use start::{is_start_command, StartHandler};
