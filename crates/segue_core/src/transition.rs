//! Scene transition state machine
//!
//! A [`Transition`] blends from the host's active scene to a new scene over a
//! fixed duration. Neither scene knows a transition is happening: each is
//! drawn into its own off-screen target and the two targets are composited
//! as layers until progress reaches 1.0, at which point the incoming scene
//! is handed to the host.
//!
//! # Example
//! ```ignore
//! let mut transition = Transition::new(0.5)?
//!     .with_settings(TransitionSettings::new().with_incoming_animated(true))
//!     .with_effect(TransitionEffect::Crossfade);
//!
//! transition.start(next_scene, &mut director)?;
//!
//! // Each frame
//! if transition.tick(&mut director, dt)?.is_finished() {
//!     // drop the transition
//! }
//! ```

use crate::effect::TransitionEffect;
use crate::host::{Host, Viewport};
use crate::layer::{Layer, LayerStack, SceneRole};
use crate::render_target::{RenderPass, RenderTarget};
use crate::scene::Scene;
use crate::settings::{DownScale, SettingsError, TransitionSettings};

/// Coarse lifecycle state of a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    /// Constructed, not yet started
    Idle,
    /// Started and being ticked
    Running,
    /// Completed (or aborted); the transition can be discarded
    Finished,
}

impl std::fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionPhase::Idle => write!(f, "idle"),
            TransitionPhase::Running => write!(f, "running"),
            TransitionPhase::Finished => write!(f, "finished"),
        }
    }
}

/// Result of a successful tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// Still blending, at the given progress
    Running { progress: f32 },
    /// The incoming scene is now the host's active scene
    Finished,
}

impl TickOutcome {
    pub fn is_finished(&self) -> bool {
        matches!(self, TickOutcome::Finished)
    }
}

/// Everything that only exists while a transition runs
struct Participants<Id, T> {
    outgoing: Id,
    incoming: Id,
    outgoing_was_paused: bool,
    incoming_was_paused: bool,
    viewport: Viewport,
    layers: LayerStack<T>,
}

enum TransitionState<Id, T> {
    Idle,
    Running(Participants<Id, T>),
    Finished,
}

/// A timed blend from the host's active scene to another scene
///
/// Constructed with a duration, configured, started exactly once and then
/// ticked once per frame until it reports [`TickOutcome::Finished`].
/// A transition is not reusable.
pub struct Transition<H: Host> {
    duration: f32,
    elapsed: f32,
    progress: f32,
    settings: TransitionSettings,
    effect: TransitionEffect,
    state: TransitionState<H::SceneId, H::Target>,
}

impl<H: Host> std::fmt::Debug for Transition<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("duration", &self.duration)
            .field("elapsed", &self.elapsed)
            .field("progress", &self.progress)
            .field("phase", &self.phase())
            .field("effect", &self.effect)
            .finish()
    }
}

impl<H: Host> Transition<H> {
    /// Create an idle transition lasting `duration` seconds
    pub fn new(duration: f32) -> Result<Self, SettingsError> {
        if !(duration.is_finite() && duration > 0.0) {
            return Err(SettingsError::InvalidDuration(duration));
        }
        Ok(Self {
            duration,
            elapsed: 0.0,
            progress: 0.0,
            settings: TransitionSettings::default(),
            effect: TransitionEffect::default(),
            state: TransitionState::Idle,
        })
    }

    /// Replace the settings (only meaningful before `start`)
    pub fn with_settings(mut self, settings: TransitionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the blend effect
    pub fn with_effect(mut self, effect: TransitionEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Set the outgoing scene's resolution divisor before starting
    pub fn set_outgoing_down_scale(&mut self, value: f32) -> Result<(), SettingsError> {
        self.settings.set_outgoing_down_scale(value)
    }

    /// Set the incoming scene's resolution divisor before starting
    pub fn set_incoming_down_scale(&mut self, value: f32) -> Result<(), SettingsError> {
        self.settings.set_incoming_down_scale(value)
    }

    // --- Accessors ---

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Normalized completion in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    pub fn effect(&self) -> TransitionEffect {
        self.effect
    }

    pub fn phase(&self) -> TransitionPhase {
        match self.state {
            TransitionState::Idle => TransitionPhase::Idle,
            TransitionState::Running(_) => TransitionPhase::Running,
            TransitionState::Finished => TransitionPhase::Finished,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TransitionState::Running(_))
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, TransitionState::Finished)
    }

    /// The scene being transitioned away from (while running)
    pub fn outgoing_scene(&self) -> Option<H::SceneId> {
        match &self.state {
            TransitionState::Running(p) => Some(p.outgoing),
            _ => None,
        }
    }

    /// The scene being transitioned to (while running)
    pub fn incoming_scene(&self) -> Option<H::SceneId> {
        match &self.state {
            TransitionState::Running(p) => Some(p.incoming),
            _ => None,
        }
    }

    /// The two composited layers (while running)
    pub fn layers(&self) -> Option<&LayerStack<H::Target>> {
        match &self.state {
            TransitionState::Running(p) => Some(&p.layers),
            _ => None,
        }
    }

    // --- Lifecycle ---

    /// Begin transitioning from the host's active scene to `incoming`
    ///
    /// Both scenes are put into their transition pause state, receive their
    /// start notifications and are each rendered once.
    pub fn start(&mut self, incoming: H::SceneId, host: &mut H) -> Result<(), TransitionError> {
        if !matches!(self.state, TransitionState::Idle) {
            log::error!("Transition::start called while {}", self.phase());
            return Err(TransitionError::AlreadyStarted);
        }

        let outgoing = host.active_scene().ok_or_else(|| {
            log::error!("Transition::start: host has no active scene");
            TransitionError::NoActiveScene
        })?;
        if outgoing == incoming {
            log::error!("Transition::start: scene {:?} is already active", incoming);
            return Err(TransitionError::SameScene);
        }
        if host.scene_mut(outgoing).is_none() {
            return Err(TransitionError::SceneUnavailable(SceneRole::Outgoing));
        }

        let incoming_animated = self.settings.incoming_animated();
        let outgoing_animated = self.settings.outgoing_animated();

        let (incoming_was_paused, incoming_name, incoming_projection) = {
            let scene = host
                .scene_mut(incoming)
                .ok_or(TransitionError::SceneUnavailable(SceneRole::Incoming))?;
            let was_paused = scene.is_paused();
            scene.set_paused(!incoming_animated);
            scene.on_enter();
            (was_paused, scene.name().to_string(), scene.projection())
        };

        let (outgoing_was_paused, outgoing_name, outgoing_projection) = {
            let scene = host
                .scene_mut(outgoing)
                .ok_or(TransitionError::SceneUnavailable(SceneRole::Outgoing))?;
            let was_paused = scene.is_paused();
            scene.set_paused(!outgoing_animated);
            scene.on_exit_transition_did_start();
            (was_paused, scene.name().to_string(), scene.projection())
        };

        let viewport = host.viewport();
        let over = self.settings.outgoing_over_incoming();
        let outgoing_layer = Self::make_layer(
            host,
            SceneRole::Outgoing,
            &viewport,
            self.settings.outgoing_down_scale(),
            outgoing_projection,
            if over { 1 } else { 0 },
        );
        let incoming_layer = Self::make_layer(
            host,
            SceneRole::Incoming,
            &viewport,
            self.settings.incoming_down_scale(),
            incoming_projection,
            if over { 0 } else { 1 },
        );

        let mut participants = Participants {
            outgoing,
            incoming,
            outgoing_was_paused,
            incoming_was_paused,
            viewport,
            layers: LayerStack::new(outgoing_layer, incoming_layer),
        };

        self.elapsed = 0.0;
        self.progress = 0.0;

        // Static scenes keep this first frame for the whole transition.
        Self::render(host, &mut participants, SceneRole::Outgoing)?;
        Self::render(host, &mut participants, SceneRole::Incoming)?;
        self.effect.apply(0.0, viewport.size(), &mut participants.layers);

        log::info!(
            "Transition started: '{}' -> '{}' over {:.3}s ({:?})",
            outgoing_name,
            incoming_name,
            self.duration,
            self.effect
        );
        self.state = TransitionState::Running(participants);
        Ok(())
    }

    /// Advance by `delta` seconds
    ///
    /// Renders the animated scenes while progress is below 1.0, and hands the
    /// incoming scene to the host once it reaches 1.0.
    pub fn tick(&mut self, host: &mut H, delta: f32) -> Result<TickOutcome, TransitionError> {
        let mut participants = match std::mem::replace(&mut self.state, TransitionState::Finished) {
            TransitionState::Running(participants) => participants,
            other => {
                self.state = other;
                log::error!("Transition::tick called while {}", self.phase());
                return Err(TransitionError::NotRunning(self.phase()));
            }
        };
        if !(delta.is_finite() && delta >= 0.0) {
            log::error!("Transition::tick: rejected delta {}", delta);
            self.state = TransitionState::Running(participants);
            return Err(TransitionError::InvalidDelta(delta));
        }

        self.elapsed += delta;
        self.progress = (self.elapsed / self.duration).clamp(0.0, 1.0);

        if self.progress >= 1.0 {
            self.complete(host, participants)?;
            return Ok(TickOutcome::Finished);
        }

        if let Err(err) = self.render_frame(host, &mut participants) {
            self.abort(host, participants);
            return Err(err);
        }
        self.state = TransitionState::Running(participants);
        Ok(TickOutcome::Running { progress: self.progress })
    }

    fn render_frame(
        &self,
        host: &mut H,
        participants: &mut Participants<H::SceneId, H::Target>,
    ) -> Result<(), TransitionError> {
        if self.settings.incoming_animated() {
            Self::render(host, participants, SceneRole::Incoming)?;
        }
        if self.settings.outgoing_animated() {
            Self::render(host, participants, SceneRole::Outgoing)?;
        }
        let extent = participants.viewport.size();
        self.effect.apply(self.progress, extent, &mut participants.layers);
        Ok(())
    }

    /// Hand the incoming scene to the host; order matters to host code
    fn complete(
        &mut self,
        host: &mut H,
        participants: Participants<H::SceneId, H::Target>,
    ) -> Result<(), TransitionError> {
        // A static incoming scene is not looked up while running
        if host.scene_mut(participants.incoming).is_none() {
            log::error!(
                "Transition: incoming scene {:?} vanished before completion",
                participants.incoming
            );
            self.abort(host, participants);
            return Err(TransitionError::SceneUnavailable(SceneRole::Incoming));
        }

        let Participants {
            outgoing,
            incoming,
            incoming_was_paused,
            ..
        } = participants;

        let cleanup = host.cleanup_on_exit();
        match host.scene_mut(outgoing) {
            Some(scene) => {
                scene.on_exit();
                if cleanup {
                    scene.cleanup();
                }
            }
            None => log::warn!("Transition: outgoing scene {:?} vanished before completion", outgoing),
        }

        host.present_scene(incoming);

        if let Some(scene) = host.scene_mut(incoming) {
            scene.on_enter_transition_did_finish();
            scene.set_paused(incoming_was_paused);
            log::info!("Transition finished: '{}' is active", scene.name());
        }

        self.state = TransitionState::Finished;
        Ok(())
    }

    /// Give up on a transition whose scenes can no longer be reached
    ///
    /// The outgoing scene stays active, so both pause flags go back to what
    /// they were before `start`.
    fn abort(&mut self, host: &mut H, participants: Participants<H::SceneId, H::Target>) {
        if let Some(scene) = host.scene_mut(participants.outgoing) {
            scene.set_paused(participants.outgoing_was_paused);
        }
        if let Some(scene) = host.scene_mut(participants.incoming) {
            scene.set_paused(participants.incoming_was_paused);
        }
        log::warn!("Transition aborted at progress {:.3}", self.progress);
        self.state = TransitionState::Finished;
    }

    fn make_layer(
        host: &mut H,
        role: SceneRole,
        viewport: &Viewport,
        down_scale: DownScale,
        projection: segue_math::Mat4,
        z_order: i32,
    ) -> Layer<H::Target> {
        let mut target = host.create_render_target(viewport.target_size());
        target.set_position(viewport.center());
        target.set_content_scale(viewport.content_scale / down_scale.get());
        target.set_projection(projection);
        Layer::new(target, role, z_order, viewport.size(), viewport.center())
    }

    /// Draw one participant into its layer's target
    fn render(
        host: &mut H,
        participants: &mut Participants<H::SceneId, H::Target>,
        role: SceneRole,
    ) -> Result<(), TransitionError> {
        let id = match role {
            SceneRole::Outgoing => participants.outgoing,
            SceneRole::Incoming => participants.incoming,
        };
        let scene = host.scene_mut(id).ok_or_else(|| {
            log::error!("Transition: {} scene {:?} is no longer available", role, id);
            TransitionError::SceneUnavailable(role)
        })?;
        let target = participants.layers.get_mut(role).target_mut();
        draw_scene(scene, target);
        log::debug!("Rendered {} scene '{}'", role, scene.name());
        Ok(())
    }
}

/// Clear `target` to the scene's background and run its draw traversal
pub fn draw_scene(scene: &mut dyn Scene, target: &mut dyn RenderTarget) {
    let clear = scene.background_color();
    let mut pass = RenderPass::begin(target, clear);
    scene.visit(pass.target());
}

/// Misuse of a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionError {
    /// `start` called more than once
    AlreadyStarted,
    /// `tick` called before `start` or after completion
    NotRunning(TransitionPhase),
    /// The host had no active scene to transition away from
    NoActiveScene,
    /// The incoming scene is already the active scene
    SameScene,
    /// A participant scene no longer exists in the host
    SceneUnavailable(SceneRole),
    /// Negative or non-finite frame delta
    InvalidDelta(f32),
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::AlreadyStarted => write!(f, "Transition already started"),
            TransitionError::NotRunning(phase) => {
                write!(f, "Transition is not running (currently {})", phase)
            }
            TransitionError::NoActiveScene => write!(f, "Host has no active scene"),
            TransitionError::SameScene => write!(f, "Incoming scene is already active"),
            TransitionError::SceneUnavailable(role) => {
                write!(f, "The {} scene is no longer available", role)
            }
            TransitionError::InvalidDelta(d) => write!(f, "Invalid frame delta: {}", d),
        }
    }
}

impl std::error::Error for TransitionError {}
