pub mod chime;
pub mod config;
pub mod run;
pub mod timer;
