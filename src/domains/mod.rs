//! Domains module containing business logic organized by bounded contexts.
//!
//! - **registry**: components declared by the host application
//! - **tools**: tool discovery and dispatch over the registry
//! - **controllers**: demo controllers registered by the binary

pub mod controllers;
pub mod registry;
pub mod tools;
