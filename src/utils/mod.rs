//! Shared math, time and configuration helpers

pub mod config;
pub mod precession;
pub mod time_utils;
pub mod vector_math;
