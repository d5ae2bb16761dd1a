//! User controller backed by an in-memory store.

use anyhow::anyhow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, instrument};

use super::common::{body, optional_bool, required_u64};
use crate::domains::registry::{Component, ToolArguments};

/// A stored user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub active: bool,
}

/// Body of a user creation request.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub active: Option<bool>,
}

/// CRUD operations over users.
#[derive(Debug, Default)]
pub struct UserController {
    users: RwLock<BTreeMap<u64, User>>,
    next_id: AtomicU64,
}

impl UserController {
    /// Component identifier in the registry.
    pub const COMPONENT_ID: &'static str = "userController";

    /// Create an empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// `GET /users/{id}`
    #[instrument(skip_all)]
    pub fn get_user(&self, args: &ToolArguments) -> anyhow::Result<Value> {
        let id = required_u64(args, "id")?;
        let users = self.users.read().map_err(|e| anyhow!(e.to_string()))?;
        let user = users
            .get(&id)
            .ok_or_else(|| anyhow!("User {} not found", id))?;
        Ok(serde_json::to_value(user)?)
    }

    /// `GET /users?active=...`
    #[instrument(skip_all)]
    pub fn list_users(&self, args: &ToolArguments) -> anyhow::Result<Value> {
        let active = optional_bool(args, "active");
        let users = self.users.read().map_err(|e| anyhow!(e.to_string()))?;
        let selected: Vec<&User> = users
            .values()
            .filter(|u| active.is_none_or(|wanted| u.active == wanted))
            .collect();
        Ok(serde_json::to_value(selected)?)
    }

    /// `POST /users`
    #[instrument(skip_all)]
    pub fn create_user(&self, args: &ToolArguments) -> anyhow::Result<Value> {
        let new_user: NewUser = body(args)?;
        if !new_user.email.contains('@') {
            return Err(anyhow!("Invalid email address: {}", new_user.email));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id,
            name: new_user.name,
            email: new_user.email,
            active: new_user.active.unwrap_or(true),
        };

        let mut users = self.users.write().map_err(|e| anyhow!(e.to_string()))?;
        users.insert(id, user.clone());
        info!(id, "Created user");
        Ok(serde_json::to_value(user)?)
    }

    /// `DELETE /users/{userId}`
    #[instrument(skip_all)]
    pub fn delete_user(&self, args: &ToolArguments) -> anyhow::Result<Value> {
        let id = required_u64(args, "userId")?;
        let mut users = self.users.write().map_err(|e| anyhow!(e.to_string()))?;
        let removed = users.remove(&id).is_some();
        info!(id, removed, "Delete user");
        Ok(Value::Bool(removed))
    }

    /// Registry declaration of this controller.
    pub fn component(self: Arc<Self>) -> Component {
        Component::rest_controller(Self::COMPONENT_ID, self)
            .get("getUser", |m| {
                m.path::<u64>("id")
                    .response_body::<User>()
                    .invoke(|this, args| async move { this.get_user(&args) })
            })
            .get("listUsers", |m| {
                m.query::<Option<bool>>("active")
                    .returns::<Vec<User>>()
                    .invoke(|this, args| async move { this.list_users(&args) })
            })
            .post("createUser", |m| {
                m.body::<NewUser>("user")
                    .response_body::<User>()
                    .invoke(|this, args| async move { this.create_user(&args) })
            })
            .delete("deleteUser", |m| {
                m.named("removeUser")
                    .path_as::<u64>("id", "userId")
                    .response_body::<bool>()
                    .invoke(|this, args| async move { this.delete_user(&args) })
            })
            .build()
    }
}
