//! Outbound effects
//!
//! The session never calls a collaborator from inside a frame. It queues
//! [`Command`]s; the frame driver drains them after each call and hands them
//! to [`dispatch`]. Light commands go to a background [`LightWorker`] and are
//! polled for completion on later frames, so a slow bridge can't stall the
//! game loop.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::{self, JoinHandle};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundCommand;
use crate::error::{ErrorLog, LightError};
use crate::lights::LightCommand;
use crate::motion::MotionScript;
use crate::platform::{
    AchievementNotifier, MenuControl, MenuState, SceneRenderer, SettingsStore, SmartLight, SoundControl,
};
use crate::sim::BalloonColor;

/// Sprite-level changes the renderer applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneChange {
    SpawnBalloon { color: BalloonColor, pos: Vec2, opacity: u8 },
    RemoveBalloon,
    /// Show the explosion sprite at the pop location
    Explosion { at: Vec2, color: BalloonColor },
    /// Tint the layer background
    LayerColor(BalloonColor),
    /// Stopwatch label text
    Stopwatch(String),
    DebugOverlay(Option<String>),
}

/// One outbound effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Menu(MenuState),
    Sound(SoundCommand),
    Light(LightCommand),
    Achievement { best_time: String },
    Motion(MotionScript),
    Scene(SceneChange),
    Persist { key: String, value: String },
}

/// FIFO of commands produced by the session
#[derive(Debug, Clone, Default)]
pub struct EffectQueue {
    commands: VecDeque<Command>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn motion(&mut self, script: MotionScript) {
        self.push(Command::Motion(script));
    }

    pub fn scene(&mut self, change: SceneChange) {
        self.push(Command::Scene(change));
    }

    /// Queue a sound if one was produced (sound off yields none)
    pub fn sound(&mut self, command: Option<SoundCommand>) {
        if let Some(command) = command {
            self.push(Command::Sound(command));
        }
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.commands.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Handle to a light command running on the worker
pub struct PendingLight {
    pub command: LightCommand,
    receiver: Receiver<Result<(), LightError>>,
    result: Option<Result<(), LightError>>,
}

impl PendingLight {
    fn failed(command: LightCommand, error: LightError) -> Self {
        let (_sender, receiver) = channel();
        Self {
            command,
            receiver,
            result: Some(Err(error)),
        }
    }

    /// Check if the command has finished (polls the channel)
    pub fn is_complete(&mut self) -> bool {
        if self.result.is_some() {
            return true;
        }

        match self.receiver.try_recv() {
            Ok(result) => {
                self.result = Some(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.result = Some(Err(LightError::WorkerGone));
                true
            }
        }
    }

    /// Block until the command finishes
    pub fn wait(mut self) -> Result<(), LightError> {
        if let Some(result) = self.result.take() {
            return result;
        }
        self.receiver.recv().unwrap_or(Err(LightError::WorkerGone))
    }

    pub fn result(&self) -> Option<&Result<(), LightError>> {
        self.result.as_ref()
    }

    fn take_result(&mut self) -> Option<Result<(), LightError>> {
        self.result.take()
    }
}

struct LightJob {
    command: LightCommand,
    reply: Sender<Result<(), LightError>>,
}

/// Background thread that owns the smart light
pub struct LightWorker {
    jobs: Option<Sender<LightJob>>,
    handle: Option<JoinHandle<()>>,
    pending: Vec<PendingLight>,
}

impl LightWorker {
    pub fn spawn(mut light: Box<dyn SmartLight>) -> Self {
        let (jobs, queue) = channel::<LightJob>();
        let handle = thread::spawn(move || {
            for job in queue {
                let result = job.command.apply(light.as_mut());
                let _ = job.reply.send(result);
            }
        });
        Self {
            jobs: Some(jobs),
            handle: Some(handle),
            pending: Vec::new(),
        }
    }

    /// Hand a command to the worker without waiting for it
    pub fn submit(&mut self, command: LightCommand) {
        let (reply, receiver) = channel();
        let sent = self
            .jobs
            .as_ref()
            .map(|jobs| jobs.send(LightJob { command, reply }).is_ok())
            .unwrap_or(false);

        let pending = if sent {
            PendingLight {
                command,
                receiver,
                result: None,
            }
        } else {
            PendingLight::failed(command, LightError::WorkerGone)
        };
        self.pending.push(pending);
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Collect finished commands, logging failures. Returns how many finished.
    pub fn reap(&mut self, log: &mut ErrorLog, now: f64) -> usize {
        let mut finished = 0;
        self.pending.retain_mut(|p| {
            if !p.is_complete() {
                return true;
            }
            if let Some(Err(e)) = p.take_result() {
                log.record(now, e);
            }
            finished += 1;
            false
        });
        finished
    }

    /// Block until every submitted command has finished, logging failures
    pub fn flush(&mut self, log: &mut ErrorLog, now: f64) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for p in pending {
            if let Err(e) = p.wait() {
                log.record(now, e);
            }
        }
        count
    }
}

impl Drop for LightWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Everything a drained queue is delivered to
pub struct Collaborators<'a> {
    pub menu: &'a mut dyn MenuControl,
    pub sound: &'a mut dyn SoundControl,
    pub achievements: &'a mut dyn AchievementNotifier,
    pub store: &'a mut dyn SettingsStore,
    pub scene: &'a mut dyn SceneRenderer,
    /// `None` when no bridge is paired; light commands are dropped
    pub lights: Option<&'a mut LightWorker>,
}

/// Deliver commands to collaborators. Failures are logged, never returned.
pub fn dispatch(
    commands: impl IntoIterator<Item = Command>,
    collab: &mut Collaborators<'_>,
    log: &mut ErrorLog,
    now: f64,
) {
    for command in commands {
        match command {
            Command::Menu(state) => collab.menu.control_menu(state),
            Command::Sound(sound) => sound.dispatch(collab.sound),
            Command::Light(light) => match collab.lights.as_deref_mut() {
                Some(worker) => worker.submit(light),
                None => log::debug!("No smart light paired, dropping {:?}", light),
            },
            Command::Achievement { best_time } => collab.achievements.notify_achievement(&best_time),
            Command::Motion(script) => collab.scene.play_motion(&script),
            Command::Scene(change) => collab.scene.apply_scene(&change),
            Command::Persist { key, value } => {
                if let Err(e) = collab.store.set_setting(&key, &value) {
                    log.record(now, e);
                }
            }
        }
    }

    if let Some(worker) = collab.lights.as_deref_mut() {
        worker.reap(log, now);
    }
}
