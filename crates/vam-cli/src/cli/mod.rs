mod handlers;
mod render;
mod setup;

pub use handlers::{print_notices, run};
pub use setup::{Cli, Commands};
