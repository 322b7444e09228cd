/// Presentation layer: terminal UI surfaces and the command-line interface
pub mod cli;
pub mod ui;
