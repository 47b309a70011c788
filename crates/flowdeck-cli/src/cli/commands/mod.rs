pub mod config;
pub mod dialogs;
pub mod run;
