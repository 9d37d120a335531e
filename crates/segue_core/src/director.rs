//! Reference host
//!
//! The Director owns scenes, the active-scene slot and at most one in-flight
//! transition:
//! - Scenes are stored in a slot map and referred to by [`SceneKey`]
//! - `run_scene` switches immediately, `transition_to` blends over time
//! - `update` drives the in-flight transition once per frame
//!
//! # Example
//! ```ignore
//! let mut director = Director::headless(Viewport::new(1280.0, 720.0, 2.0));
//! let title = director.add_scene(TitleScene::new());
//! let level = director.add_scene(LevelScene::new());
//! director.run_scene(title)?;
//!
//! director.transition_to(level, Transition::new(0.5)?)?;
//!
//! // Game loop
//! director.update(dt)?;
//! ```

use slotmap::{new_key_type, SlotMap};
use segue_math::PixelSize;

use crate::host::{Host, Viewport};
use crate::layer::LayerStack;
use crate::render_target::{HeadlessTarget, RenderTarget};
use crate::scene::Scene;
use crate::transition::{TickOutcome, Transition, TransitionError};

new_key_type! {
    /// Generational key to a scene owned by a [`Director`]
    pub struct SceneKey;
}

/// Factory the director allocates render targets with
pub type TargetFactory<T> = Box<dyn FnMut(PixelSize) -> T>;

/// Owns scenes and presents one of them at a time
pub struct Director<T: RenderTarget + 'static> {
    /// All scenes, active or not
    scenes: SlotMap<SceneKey, Box<dyn Scene>>,
    /// Currently presented scene
    active: Option<SceneKey>,
    /// Current drawable bounds
    viewport: Viewport,
    /// Run `cleanup` on scenes as soon as they exit
    cleanup_on_exit: bool,
    /// Allocates off-screen targets for transitions
    target_factory: TargetFactory<T>,
    /// In-flight transition, if any
    transition: Option<Transition<Self>>,
}

impl Director<HeadlessTarget> {
    /// Director that renders into CPU-side [`HeadlessTarget`]s
    pub fn headless(viewport: Viewport) -> Self {
        Self::new(viewport, Box::new(HeadlessTarget::new))
    }
}

impl<T: RenderTarget + 'static> Director<T> {
    /// Create a director with no scenes
    pub fn new(viewport: Viewport, target_factory: TargetFactory<T>) -> Self {
        Self {
            scenes: SlotMap::with_key(),
            active: None,
            viewport,
            cleanup_on_exit: false,
            target_factory,
            transition: None,
        }
    }

    /// Clean up scenes as soon as they exit
    pub fn with_cleanup_on_exit(mut self, cleanup: bool) -> Self {
        self.cleanup_on_exit = cleanup;
        self
    }

    /// Update the drawable bounds
    ///
    /// A running transition keeps the targets it allocated at start.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // --- Scene storage ---

    /// Take ownership of a scene
    pub fn add_scene(&mut self, scene: impl Scene + 'static) -> SceneKey {
        self.add_boxed_scene(Box::new(scene))
    }

    /// Take ownership of an already boxed scene
    pub fn add_boxed_scene(&mut self, scene: Box<dyn Scene>) -> SceneKey {
        self.scenes.insert(scene)
    }

    /// Remove a scene, returning it to the caller
    ///
    /// Removing the active scene leaves the director with no active scene.
    pub fn remove_scene(&mut self, key: SceneKey) -> Option<Box<dyn Scene>> {
        if self.active == Some(key) {
            self.active = None;
        }
        self.scenes.remove(key)
    }

    /// Get a scene by key
    pub fn scene(&self, key: SceneKey) -> Option<&dyn Scene> {
        self.scenes.get(key).map(|s| s.as_ref())
    }

    /// Number of owned scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Key of the presented scene
    pub fn active_scene_key(&self) -> Option<SceneKey> {
        self.active
    }

    // --- Switching ---

    /// Present `key` immediately, without a transition
    pub fn run_scene(&mut self, key: SceneKey) -> Result<(), DirectorError> {
        if self.transition.is_some() {
            return Err(DirectorError::TransitionInProgress);
        }
        if !self.scenes.contains_key(key) {
            return Err(DirectorError::SceneNotFound(key));
        }
        if self.active == Some(key) {
            return Ok(());
        }

        if let Some(previous) = self.active.and_then(|k| self.scenes.get_mut(k)) {
            previous.on_exit();
            if self.cleanup_on_exit {
                previous.cleanup();
            }
        }

        if let Some(scene) = self.scenes.get_mut(key) {
            scene.on_enter();
            scene.on_enter_transition_did_finish();
            log::info!("Running scene '{}'", scene.name());
        }
        self.active = Some(key);
        Ok(())
    }

    /// Start blending from the active scene to `key`
    pub fn transition_to(
        &mut self,
        key: SceneKey,
        mut transition: Transition<Self>,
    ) -> Result<(), DirectorError> {
        if self.transition.is_some() {
            return Err(DirectorError::TransitionInProgress);
        }
        if !self.scenes.contains_key(key) {
            return Err(DirectorError::SceneNotFound(key));
        }
        transition.start(key, self)?;
        self.transition = Some(transition);
        Ok(())
    }

    /// Whether a transition is in flight
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// The in-flight transition
    pub fn transition(&self) -> Option<&Transition<Self>> {
        self.transition.as_ref()
    }

    /// Layers to composite this frame, if a transition is in flight
    pub fn transition_layers(&self) -> Option<&LayerStack<T>> {
        self.transition.as_ref().and_then(|t| t.layers())
    }

    // --- Update ---

    /// Advance the in-flight transition by `dt` seconds
    ///
    /// Returns true if the active scene changed this frame. A transition
    /// that rejects the delta stays in flight; one that aborts is dropped.
    pub fn update(&mut self, dt: f32) -> Result<bool, DirectorError> {
        let Some(mut transition) = self.transition.take() else {
            return Ok(false);
        };

        match transition.tick(self, dt) {
            Ok(TickOutcome::Finished) => Ok(true),
            Ok(TickOutcome::Running { .. }) => {
                self.transition = Some(transition);
                Ok(false)
            }
            Err(err) => {
                if transition.is_running() {
                    self.transition = Some(transition);
                }
                Err(err.into())
            }
        }
    }
}

impl<T: RenderTarget + 'static> Host for Director<T> {
    type SceneId = SceneKey;
    type Target = T;

    fn active_scene(&self) -> Option<SceneKey> {
        self.active
    }

    fn present_scene(&mut self, scene: SceneKey) {
        self.active = Some(scene);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn cleanup_on_exit(&self) -> bool {
        self.cleanup_on_exit
    }

    fn scene_mut(&mut self, scene: SceneKey) -> Option<&mut dyn Scene> {
        let scene: &mut dyn Scene = self.scenes.get_mut(scene)?.as_mut();
        Some(scene)
    }

    fn create_render_target(&mut self, size: PixelSize) -> T {
        (self.target_factory)(size)
    }
}

/// Error from a director operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectorError {
    /// No scene with this key
    SceneNotFound(SceneKey),
    /// A transition is already in flight
    TransitionInProgress,
    /// The transition rejected the operation
    Transition(TransitionError),
}

impl From<TransitionError> for DirectorError {
    fn from(e: TransitionError) -> Self {
        DirectorError::Transition(e)
    }
}

impl std::fmt::Display for DirectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectorError::SceneNotFound(key) => write!(f, "Scene not found: {:?}", key),
            DirectorError::TransitionInProgress => write!(f, "A transition is already in progress"),
            DirectorError::Transition(e) => write!(f, "Transition error: {}", e),
        }
    }
}

impl std::error::Error for DirectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectorError::Transition(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct NamedScene {
        name: &'static str,
        paused: bool,
        log: Log,
    }

    impl NamedScene {
        fn new(name: &'static str, log: &Log) -> Self {
            Self { name, paused: false, log: log.clone() }
        }

        fn record(&self, event: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, event));
        }
    }

    impl Scene for NamedScene {
        fn name(&self) -> &str {
            self.name
        }
        fn on_enter(&mut self) {
            self.record("enter");
        }
        fn on_exit(&mut self) {
            self.record("exit");
        }
        fn on_enter_transition_did_finish(&mut self) {
            self.record("enter_finished");
        }
        fn cleanup(&mut self) {
            self.record("cleanup");
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn set_paused(&mut self, paused: bool) {
            self.paused = paused;
        }
        fn visit(&mut self, _target: &mut dyn RenderTarget) {}
    }

    fn director() -> Director<HeadlessTarget> {
        Director::headless(Viewport::new(640.0, 480.0, 1.0))
    }

    #[test]
    fn test_new() {
        let d = director();
        assert!(d.active_scene_key().is_none());
        assert_eq!(d.scene_count(), 0);
        assert!(!d.is_transitioning());
        assert!(!d.cleanup_on_exit());
    }

    #[test]
    fn test_add_and_get_scene() {
        let log = Log::default();
        let mut d = director();
        let key = d.add_scene(NamedScene::new("menu", &log));
        assert_eq!(d.scene_count(), 1);
        assert_eq!(d.scene(key).map(|s| s.name()), Some("menu"));
    }

    #[test]
    fn test_run_scene_fires_hooks() {
        let log = Log::default();
        let mut d = director().with_cleanup_on_exit(true);
        let a = d.add_scene(NamedScene::new("a", &log));
        let b = d.add_scene(NamedScene::new("b", &log));

        d.run_scene(a).unwrap();
        d.run_scene(b).unwrap();

        assert_eq!(d.active_scene_key(), Some(b));
        assert_eq!(
            *log.borrow(),
            vec!["a:enter", "a:enter_finished", "a:exit", "a:cleanup", "b:enter", "b:enter_finished"]
        );
    }

    #[test]
    fn test_run_active_scene_is_noop() {
        let log = Log::default();
        let mut d = director();
        let a = d.add_scene(NamedScene::new("a", &log));
        d.run_scene(a).unwrap();
        log.borrow_mut().clear();

        d.run_scene(a).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_run_scene_not_found() {
        let log = Log::default();
        let mut d = director();
        let key = d.add_scene(NamedScene::new("gone", &log));
        d.remove_scene(key);

        match d.run_scene(key) {
            Err(DirectorError::SceneNotFound(k)) => assert_eq!(k, key),
            other => panic!("Expected SceneNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_active_scene_clears_active() {
        let log = Log::default();
        let mut d = director();
        let a = d.add_scene(NamedScene::new("a", &log));
        d.run_scene(a).unwrap();

        let removed = d.remove_scene(a);
        assert!(removed.is_some());
        assert!(d.active_scene_key().is_none());
        assert!(d.scene_mut(a).is_none());
    }

    #[test]
    fn test_transition_to_and_update() {
        let log = Log::default();
        let mut d = director();
        let a = d.add_scene(NamedScene::new("a", &log));
        let b = d.add_scene(NamedScene::new("b", &log));
        d.run_scene(a).unwrap();

        d.transition_to(b, Transition::new(0.5).unwrap()).unwrap();
        assert!(d.is_transitioning());
        assert!(d.transition_layers().is_some());
        assert_eq!(d.active_scene_key(), Some(a));

        assert_eq!(d.update(0.25), Ok(false));
        assert_eq!(d.active_scene_key(), Some(a));

        assert_eq!(d.update(0.25), Ok(true));
        assert_eq!(d.active_scene_key(), Some(b));
        assert!(!d.is_transitioning());
        assert!(d.transition_layers().is_none());
    }

    #[test]
    fn test_second_transition_rejected_while_running() {
        let log = Log::default();
        let mut d = director();
        let a = d.add_scene(NamedScene::new("a", &log));
        let b = d.add_scene(NamedScene::new("b", &log));
        let c = d.add_scene(NamedScene::new("c", &log));
        d.run_scene(a).unwrap();
        d.transition_to(b, Transition::new(1.0).unwrap()).unwrap();

        let result = d.transition_to(c, Transition::new(1.0).unwrap());
        assert_eq!(result, Err(DirectorError::TransitionInProgress));
        assert_eq!(d.run_scene(c), Err(DirectorError::TransitionInProgress));
    }

    #[test]
    fn test_transition_without_active_scene() {
        let log = Log::default();
        let mut d = director();
        let b = d.add_scene(NamedScene::new("b", &log));

        let result = d.transition_to(b, Transition::new(1.0).unwrap());
        assert_eq!(result, Err(DirectorError::Transition(TransitionError::NoActiveScene)));
        assert!(!d.is_transitioning());
    }

    #[test]
    fn test_rejected_delta_keeps_transition() {
        let log = Log::default();
        let mut d = director();
        let a = d.add_scene(NamedScene::new("a", &log));
        let b = d.add_scene(NamedScene::new("b", &log));
        d.run_scene(a).unwrap();
        d.transition_to(b, Transition::new(1.0).unwrap()).unwrap();

        assert_eq!(
            d.update(-0.1),
            Err(DirectorError::Transition(TransitionError::InvalidDelta(-0.1)))
        );
        assert!(d.is_transitioning());
        assert_eq!(d.active_scene_key(), Some(a));

        // The transition still completes and hands back normal pause state
        assert_eq!(d.update(1.0), Ok(true));
        assert_eq!(d.active_scene_key(), Some(b));
        assert!(!d.scene(b).unwrap().is_paused());
        assert!(log.borrow().contains(&"b:enter_finished".to_string()));
    }

    #[test]
    fn test_removed_static_incoming_is_not_presented() {
        let log = Log::default();
        let mut d = director();
        let a = d.add_scene(NamedScene::new("a", &log));
        let b = d.add_scene(NamedScene::new("b", &log));
        d.run_scene(a).unwrap();
        d.transition_to(b, Transition::new(1.0).unwrap()).unwrap();
        d.remove_scene(b);

        assert_eq!(
            d.update(1.0),
            Err(DirectorError::Transition(TransitionError::SceneUnavailable(
                crate::layer::SceneRole::Incoming
            )))
        );
        assert!(!d.is_transitioning());
        assert_eq!(d.active_scene_key(), Some(a));
        assert!(!d.scene(a).unwrap().is_paused());
    }

    #[test]
    fn test_update_without_transition() {
        let mut d = director();
        assert_eq!(d.update(0.016), Ok(false));
    }

    #[test]
    fn test_factory_receives_ceiled_viewport() {
        let log = Log::default();
        let sizes: Rc<RefCell<Vec<PixelSize>>> = Rc::default();
        let seen = sizes.clone();
        let mut d = Director::new(
            Viewport::new(100.4, 50.6, 1.0),
            Box::new(move |size| {
                seen.borrow_mut().push(size);
                HeadlessTarget::new(size)
            }),
        );
        let a = d.add_scene(NamedScene::new("a", &log));
        let b = d.add_scene(NamedScene::new("b", &log));
        d.run_scene(a).unwrap();
        d.transition_to(b, Transition::new(1.0).unwrap()).unwrap();

        assert_eq!(*sizes.borrow(), vec![PixelSize::new(101, 51); 2]);
    }

    #[test]
    fn test_error_display() {
        let msg = format!("{}", DirectorError::TransitionInProgress);
        assert!(msg.contains("in progress"));
        let msg = format!("{}", DirectorError::Transition(TransitionError::SameScene));
        assert!(msg.contains("already active"));
    }
}
