#![allow(clippy::too_many_arguments, clippy::len_zero)]

pub mod app;
pub mod client;
pub mod events;
pub mod theme;
pub mod ui;
