#![allow(
    clippy::comparison_chain,
    clippy::let_and_return,
    clippy::identity_op,
    clippy::needless_bool,
    clippy::collapsible_if
)]

pub mod clock;
pub mod config;
pub mod elapsed;
pub mod prelude;
pub mod stopwatch;
pub mod tick_scheduler;
