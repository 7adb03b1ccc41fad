// Core encoding engine - independent of the CLI surface

pub mod core;
pub mod hardware;
pub mod runner;

pub use self::core::*;
