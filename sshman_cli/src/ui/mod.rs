pub mod cli;
pub mod presenter;
pub(crate) mod prompt;
