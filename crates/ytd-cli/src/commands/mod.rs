pub mod config;
pub mod doctor;
pub mod fetch;
pub mod info;
pub mod interactive;
