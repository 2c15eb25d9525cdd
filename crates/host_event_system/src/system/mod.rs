/// Event bus broken into registration, emission and statistics.
mod core;
mod emitters;
mod handlers;
mod stats;

pub use core::EventSystem;
pub use stats::EventSystemStats;
