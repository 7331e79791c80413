pub mod cli;
pub mod config;
pub mod constants;
pub mod inspect;
pub mod logging;
pub mod render;
pub mod snapshot;
pub mod upstream;
pub mod watch;
