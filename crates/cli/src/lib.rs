//! Line-oriented interactive front end over the inventory service.

pub mod shell;

pub use shell::{Shell, ShellError};
