pub mod app;
pub mod display;
pub mod poller;
pub mod signal;

pub use app::*;
pub use display::*;
pub use poller::*;
pub use signal::*;
