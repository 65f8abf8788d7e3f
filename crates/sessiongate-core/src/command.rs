// ABOUTME: Command interpreter seam and the built-in interpreter that mutates the session.
// ABOUTME: Command lines may chain several commands with ';'; the first failure aborts the rest.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::session::Session;

/// Errors returned when a command line is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown or unsupported command '{0}'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("variable '{0}' is not set")]
    UnknownVariable(String),

    #[error("module {name} is already {state}")]
    ModuleState { name: String, state: &'static str },
}

/// Something that can execute a command line against the session.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, line: &str) -> Result<(), CommandError>;
}

/// The built-in interpreter.
pub struct Interpreter {
    session: Arc<Session>,
}

impl Interpreter {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    async fn run_one(&self, cmd: &str) -> Result<(), CommandError> {
        let mut parts = cmd.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = parts.collect();

        match head {
            "set" => self.set(&args).await,
            "get" => self.get(&args).await,
            "events.clear" if args.is_empty() => {
                self.session.events().clear().await;
                Ok(())
            }
            _ => match args.as_slice() {
                ["on"] => self.toggle_module(head, true).await,
                ["off"] => self.toggle_module(head, false).await,
                _ => Err(CommandError::Unknown(cmd.to_string())),
            },
        }
    }

    async fn set(&self, args: &[&str]) -> Result<(), CommandError> {
        let [name, value @ ..] = args else {
            return Err(CommandError::Usage("set NAME VALUE"));
        };
        if value.is_empty() {
            return Err(CommandError::Usage("set NAME VALUE"));
        }
        let value = value.join(" ");

        self.session.write().await.env.set(*name, value.clone());
        self.session
            .events()
            .add("env.set", serde_json::json!({ "name": name, "value": value }))
            .await;
        Ok(())
    }

    async fn get(&self, args: &[&str]) -> Result<(), CommandError> {
        let [name] = args else {
            return Err(CommandError::Usage("get NAME"));
        };
        let state = self.session.read().await;
        match state.env.get(name) {
            Some(_) => Ok(()),
            None => Err(CommandError::UnknownVariable((*name).to_string())),
        }
    }

    /// `wifi on` and `wifi.recon on` both address the `wifi` module.
    async fn toggle_module(&self, target: &str, start: bool) -> Result<(), CommandError> {
        let name = {
            let mut state = self.session.write().await;
            let module_name = target.split('.').next().unwrap_or(target);
            let idx = state
                .modules
                .iter()
                .position(|m| m.name == target)
                .or_else(|| state.modules.iter().position(|m| m.name == module_name))
                .ok_or_else(|| CommandError::Unknown(format!("{target} {}", on_off(start))))?;
            let module = &mut state.modules[idx];

            if module.running == start {
                return Err(CommandError::ModuleState {
                    name: module.name.clone(),
                    state: if start { "running" } else { "not running" },
                });
            }
            module.running = start;
            module.name.clone()
        };

        let tag = if start { "mod.started" } else { "mod.stopped" };
        tracing::debug!(module = %name, tag, "module state changed");
        self.session.events().add(tag, serde_json::json!(name)).await;
        Ok(())
    }
}

fn on_off(start: bool) -> &'static str {
    if start { "on" } else { "off" }
}

#[async_trait]
impl CommandRunner for Interpreter {
    async fn run(&self, line: &str) -> Result<(), CommandError> {
        let commands: Vec<&str> = line
            .split(';')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        if commands.is_empty() {
            return Err(CommandError::Empty);
        }

        for cmd in commands {
            self.run_one(cmd).await?;
        }
        Ok(())
    }
}
