mod lookup;
mod root;
mod show;

pub use root::Cli;
