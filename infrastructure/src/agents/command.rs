//! Process-backed agent gateway.
//!
//! Each invocation spawns the command configured for the role, writes the
//! rendered brief to its stdin and classifies whatever it prints by the
//! final `STATUS:` line. The child is killed when the invocation future is
//! dropped, so a coordinator timeout does not leave stray processes.

use super::brief::render_brief;
use crate::config::FileAgentsConfig;
use async_trait::async_trait;
use orchestra_application::{AgentGateway, AgentReply, AgentRequest, GatewayError};
use orchestra_domain::AgentRole;
use orchestra_domain::util::truncate_str;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Stderr kept in [`GatewayError::ExitStatus`]
const MAX_STDERR_BYTES: usize = 2048;

/// Program and arguments for one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl AgentCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Agent gateway that runs one process per invocation
#[derive(Debug, Clone, Default)]
pub struct CommandAgentGateway {
    commands: BTreeMap<AgentRole, AgentCommand>,
    workdir: Option<PathBuf>,
}

impl CommandAgentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the gateway from the `[agents]` section.
    pub fn from_config(config: &FileAgentsConfig) -> Self {
        let mut gateway = Self::new();
        for role in AgentRole::ALL.into_iter().filter(AgentRole::is_group_worker) {
            if let Some(entry) = config.command_for(role) {
                gateway = gateway
                    .with_command(role, AgentCommand::new(entry.command).with_args(entry.args));
            }
        }
        gateway.workdir = config.workdir.clone();
        gateway
    }

    pub fn with_command(mut self, role: AgentRole, command: AgentCommand) -> Self {
        self.commands.insert(role, command);
        self
    }

    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Roles that have a command configured
    pub fn configured_roles(&self) -> Vec<AgentRole> {
        self.commands.keys().copied().collect()
    }

    fn build(&self, command: &AgentCommand, request: &AgentRequest) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .env("ORCHESTRA_SESSION_ID", request.session_id.as_str())
            .env("ORCHESTRA_GROUP_ID", request.group_id.as_str())
            .env("ORCHESTRA_ROLE", request.role.as_str())
            .env("ORCHESTRA_REVISION", request.revision.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl AgentGateway for CommandAgentGateway {
    async fn invoke(&self, request: &AgentRequest) -> Result<AgentReply, GatewayError> {
        let command = self
            .commands
            .get(&request.role)
            .ok_or(GatewayError::NotConfigured(request.role))?;

        debug!(
            "Spawning {} for group {} ({})",
            command.program,
            request.group_id,
            request.role.as_str()
        );
        let mut child = self
            .build(command, request)
            .spawn()
            .map_err(|e| GatewayError::SpawnFailed(format!("{}: {}", command.program, e)))?;

        // The brief is written from its own task while the output is drained;
        // an agent that prints before reading would otherwise block on a
        // full stdout pipe while we block on a full stdin pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            let brief = render_brief(request);
            let program = command.program.clone();
            tokio::spawn(async move {
                match stdin.write_all(brief.as_bytes()).await {
                    Ok(()) => Ok(()),
                    // The agent exited or closed stdin without reading its brief.
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                        debug!("{} did not read its brief", program);
                        Ok(())
                    }
                    Err(e) => Err(e),
                }
                // Dropping stdin closes the pipe so the agent sees EOF.
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GatewayError::Io(e.to_string()))?;

        if let Some(writer) = writer {
            writer
                .await
                .map_err(|e| GatewayError::Io(format!("brief writer failed: {}", e)))?
                .map_err(|e| GatewayError::Io(e.to_string()))?;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GatewayError::ExitStatus {
                code: output.status.code(),
                stderr: truncate_str(&stderr, MAX_STDERR_BYTES).to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(AgentReply::from_text(request.role, stdout))
    }
}
