#![forbid(unsafe_code)]

pub mod check;
pub mod cli;
pub mod config;
pub mod consent;
pub mod detect;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod logging;
pub mod notify;
pub mod page;
pub mod state;
pub mod validate;
