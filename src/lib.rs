pub mod aggregate;
pub mod annotate;
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod profile;
pub mod report;
pub mod runner;
pub mod sys;
pub mod tree;
