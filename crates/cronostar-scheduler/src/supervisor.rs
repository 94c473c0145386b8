//! Owns one scheduling task per controller
//!
//! Each controller runs in its own tokio task that ticks on the
//! controller's interval and serves commands from an mpsc channel.
//! Dropping a task's command sender ends its loop, so stopping a
//! controller never leaves a timer behind.

use crate::controller::{Controller, ControllerStatus, TickOutcome};
use crate::error::{SchedulerError, SchedulerResult};
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

const COMMAND_BUFFER: usize = 16;

enum Command {
    ApplyNow(oneshot::Sender<TickOutcome>),
    SetProfile(String, oneshot::Sender<TickOutcome>),
    Pause(oneshot::Sender<()>),
    Resume(oneshot::Sender<()>),
    Status(oneshot::Sender<ControllerStatus>),
}

struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

/// Runs and addresses scheduling tasks by controller name
pub struct SchedulingSupervisor {
    handles: DashMap<String, ControllerHandle>,
}

impl SchedulingSupervisor {
    pub fn new() -> Self {
        Self {
            handles: DashMap::new(),
        }
    }

    /// Spawn the controller's task, replacing a running one with the same name
    pub fn start(&self, controller: Controller) {
        let name = controller.name().to_string();
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(run_controller(controller, rx));

        if let Some(old) = self.handles.insert(
            name.clone(),
            ControllerHandle { commands: tx, task },
        ) {
            debug!(controller = %name, "Replacing running controller");
            old.task.abort();
        }
    }

    /// Stop one controller and wait for its task to end
    pub async fn stop(&self, name: &str) -> bool {
        let Some((_, handle)) = self.handles.remove(name) else {
            return false;
        };
        drop(handle.commands);
        if let Err(e) = handle.task.await {
            if !e.is_cancelled() {
                warn!(controller = %name, error = %e, "Controller task ended abnormally");
            }
        }
        true
    }

    pub async fn stop_all(&self) {
        let names = self.controllers();
        info!("Stopping {} controllers", names.len());
        for name in names {
            self.stop(&name).await;
        }
    }

    /// Evaluate and actuate immediately, regardless of change or pause state
    pub async fn apply_now(&self, name: &str) -> SchedulerResult<TickOutcome> {
        self.request(name, Command::ApplyNow).await
    }

    /// Switch profile and run a pass with the new one
    pub async fn set_profile(
        &self,
        name: &str,
        profile: impl Into<String>,
    ) -> SchedulerResult<TickOutcome> {
        let profile = profile.into();
        self.request(name, |reply| Command::SetProfile(profile, reply))
            .await
    }

    pub async fn pause(&self, name: &str) -> SchedulerResult<()> {
        self.request(name, Command::Pause).await
    }

    pub async fn resume(&self, name: &str) -> SchedulerResult<()> {
        self.request(name, Command::Resume).await
    }

    pub async fn status(&self, name: &str) -> SchedulerResult<ControllerStatus> {
        self.request(name, Command::Status).await
    }

    /// Names of running controllers, sorted
    pub fn controllers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handles.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    async fn request<T>(
        &self,
        name: &str,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> SchedulerResult<T> {
        // Clone the sender so no shard lock is held across the await
        let sender = self
            .handles
            .get(name)
            .map(|h| h.commands.clone())
            .ok_or_else(|| SchedulerError::UnknownController(name.to_string()))?;

        let (reply_tx, reply_rx) = oneshot::channel();
        sender
            .send(command(reply_tx))
            .await
            .map_err(|_| SchedulerError::TaskStopped(name.to_string()))?;
        reply_rx
            .await
            .map_err(|_| SchedulerError::TaskStopped(name.to_string()))
    }
}

impl Default for SchedulingSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_controller(mut controller: Controller, mut commands: mpsc::Receiver<Command>) {
    let mut interval = tokio::time::interval(controller.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        controller = %controller.name(),
        entity_id = %controller.target().entity_id(),
        profile = %controller.profile(),
        interval_secs = controller.interval().as_secs(),
        "Controller started"
    );

    loop {
        tokio::select! {
            // The first tick completes immediately, giving an initial pass
            _ = interval.tick() => {
                let outcome = controller.tick().await;
                trace!(controller = %controller.name(), ?outcome, "Tick");
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    Command::ApplyNow(reply) => {
                        let _ = reply.send(controller.apply_now().await);
                    }
                    Command::SetProfile(profile, reply) => {
                        controller.set_profile(profile);
                        let _ = reply.send(controller.tick().await);
                    }
                    Command::Pause(reply) => {
                        controller.pause();
                        let _ = reply.send(());
                    }
                    Command::Resume(reply) => {
                        controller.resume();
                        let _ = reply.send(());
                    }
                    Command::Status(reply) => {
                        let _ = reply.send(controller.status());
                    }
                }
            }
        }
    }

    info!(controller = %controller.name(), "Controller stopped");
}
