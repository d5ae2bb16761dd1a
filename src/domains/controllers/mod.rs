//! Demo host controllers.
//!
//! These controllers stand in for the host application's own request
//! handlers. They are registered like any other component and show up in the
//! tool catalog without any gateway-specific code.

mod common;
mod greeting;
mod users;

pub use greeting::GreetingController;
pub use users::{NewUser, User, UserController};

use std::sync::Arc;
use tracing::info;

use crate::domains::registry::{HandlerRegistry, RegistryError};

/// Register every demo controller with `registry`.
pub fn register_all(registry: &HandlerRegistry) -> Result<(), RegistryError> {
    registry.register(Arc::new(GreetingController::default()).component())?;
    registry.register(Arc::new(UserController::new()).component())?;

    info!(components = registry.len()?, "Registered demo controllers");
    Ok(())
}
