//! On-disk containers for chunk trees.

pub mod region;
