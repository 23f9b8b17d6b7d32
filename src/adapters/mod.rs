//! Adapters - Implementations of ports for external systems.

pub mod ai;
