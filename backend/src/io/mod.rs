//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain. Handlers are plain
//! async functions wired into axum routers, with services injected through
//! the shared application state.

pub mod rest;
