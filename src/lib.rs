//! SIDEO - Choosing By Advantages Decision Engine
//!
//! This crate implements the deterministic core of the CBA method: rating
//! scales, importance caps and suggested ranges, best/worst attribute
//! resolution, score auditing, cost-per-advantage ranking, and inconsistency
//! detection, plus an LLM rewrite layer that always falls back to the
//! deterministic renderers.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
