//! Integration tests for the transition lifecycle
//!
//! These tests drive transitions through the public API only:
//! 1. A hand-written host (not the Director) satisfies the Host contract
//! 2. A full run through the Director hands the scene over exactly once
//! 3. Presets build transitions that behave like hand-configured ones

use segue_core::{
    Color, Director, HeadlessTarget, Host, PixelSize, QuadVertex, RenderTarget, Scene, SceneRole,
    TickOutcome, Transition, TransitionEffect, TransitionError, TransitionPhase, TransitionPreset,
    TransitionSettings, Viewport,
};

// ==================== Minimal Host ====================

/// Scene that records how it was driven
struct CountingScene {
    name: String,
    paused: bool,
    entered: u32,
    exited: u32,
    finished: u32,
    draws: u32,
}

impl CountingScene {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            paused: false,
            entered: 0,
            exited: 0,
            finished: 0,
            draws: 0,
        }
    }
}

impl Scene for CountingScene {
    fn name(&self) -> &str {
        &self.name
    }
    fn on_enter(&mut self) {
        self.entered += 1;
    }
    fn on_exit(&mut self) {
        self.exited += 1;
    }
    fn on_enter_transition_did_finish(&mut self) {
        self.finished += 1;
    }
    fn is_paused(&self) -> bool {
        self.paused
    }
    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
    fn background_color(&self) -> Color {
        Color::rgb(0.1, 0.1, 0.1)
    }
    fn visit(&mut self, target: &mut dyn RenderTarget) {
        self.draws += 1;
        target.draw(&[QuadVertex::default(); 4]);
    }
}

/// Host storing scenes in a plain Vec, identified by index
struct VecHost {
    scenes: Vec<CountingScene>,
    active: Option<usize>,
    presented: Vec<usize>,
    viewport: Viewport,
}

impl VecHost {
    fn new(names: &[&str]) -> Self {
        Self {
            scenes: names.iter().map(|n| CountingScene::new(n)).collect(),
            active: Some(0),
            presented: Vec::new(),
            viewport: Viewport::new(320.0, 240.0, 1.0),
        }
    }
}

impl Host for VecHost {
    type SceneId = usize;
    type Target = HeadlessTarget;

    fn active_scene(&self) -> Option<usize> {
        self.active
    }

    fn present_scene(&mut self, scene: usize) {
        self.presented.push(scene);
        self.active = Some(scene);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn cleanup_on_exit(&self) -> bool {
        false
    }

    fn scene_mut(&mut self, scene: usize) -> Option<&mut dyn Scene> {
        let scene: &mut dyn Scene = self.scenes.get_mut(scene)?;
        Some(scene)
    }

    fn create_render_target(&mut self, size: PixelSize) -> HeadlessTarget {
        HeadlessTarget::new(size)
    }
}

// ==================== Custom Host Tests ====================

#[test]
fn test_custom_host_full_run() {
    let mut host = VecHost::new(&["title", "level"]);
    let mut transition: Transition<VecHost> = Transition::new(0.5)
        .unwrap()
        .with_settings(TransitionSettings::new().with_incoming_animated(true));

    transition.start(1, &mut host).unwrap();
    assert_eq!(host.scenes[1].entered, 1);
    assert_eq!(host.scenes[0].draws, 1);
    assert_eq!(host.scenes[1].draws, 1);

    let mut frames = 0;
    loop {
        frames += 1;
        match transition.tick(&mut host, 1.0 / 60.0).unwrap() {
            TickOutcome::Running { .. } => continue,
            TickOutcome::Finished => break,
        }
    }

    // 0.5s at 60fps completes on the 30th or 31st frame depending on rounding
    assert!((30..=31).contains(&frames), "finished after {} frames", frames);
    assert_eq!(host.presented, vec![1]);
    assert_eq!(host.scenes[0].exited, 1);
    assert_eq!(host.scenes[1].finished, 1);
    assert_eq!(host.scenes[0].draws, 1, "static outgoing scene drawn once");
    assert_eq!(host.scenes[1].draws, frames, "animated incoming drawn at start and every running frame");
    assert!(!host.scenes[1].paused);
}

#[test]
fn test_custom_host_out_of_range_scene() {
    let mut host = VecHost::new(&["only"]);
    let mut transition: Transition<VecHost> = Transition::new(1.0).unwrap();
    assert_eq!(
        transition.start(7, &mut host),
        Err(TransitionError::SceneUnavailable(SceneRole::Incoming))
    );
    assert_eq!(transition.phase(), TransitionPhase::Idle);
}

// ==================== Director Tests ====================

#[test]
fn test_director_hands_over_once() {
    let mut director = Director::headless(Viewport::new(1280.0, 720.0, 2.0));
    let menu = director.add_scene(CountingScene::new("menu"));
    let game = director.add_scene(CountingScene::new("game"));
    director.run_scene(menu).unwrap();

    director
        .transition_to(game, Transition::new(0.25).unwrap())
        .unwrap();

    let layers = director.transition_layers().unwrap();
    assert_eq!(layers.outgoing().target().size(), PixelSize::new(1280, 720));
    assert_eq!(layers.outgoing().target().content_scale(), 2.0);

    let mut changes = 0;
    for _ in 0..20 {
        if director.update(0.05).unwrap() {
            changes += 1;
        }
    }

    assert_eq!(changes, 1);
    assert_eq!(director.active_scene_key(), Some(game));
    assert!(!director.is_transitioning());
}

#[test]
fn test_director_layers_composite_bottom_to_top() {
    let mut director = Director::headless(Viewport::default());
    let a = director.add_scene(CountingScene::new("a"));
    let b = director.add_scene(CountingScene::new("b"));
    director.run_scene(a).unwrap();

    let settings = TransitionSettings::new().with_outgoing_over_incoming(true);
    director
        .transition_to(b, Transition::new(1.0).unwrap().with_settings(settings))
        .unwrap();
    director.update(0.5).unwrap();

    let order = director.transition_layers().unwrap().draw_order();
    assert_eq!(order[0].role(), SceneRole::Incoming);
    assert_eq!(order[1].role(), SceneRole::Outgoing);

    // Outgoing is on top and half faded
    let quad = order[1].quad();
    assert!((quad[0].opacity - 0.5).abs() < 1e-4);
}

// ==================== Preset Tests ====================

#[test]
fn test_preset_drives_director() {
    let preset: TransitionPreset = ron::from_str(
        r#"(
            name: "menu_to_game",
            duration: 0.2,
            effect: Fade,
            incoming_down_scale: 2.0,
            incoming_animated: true,
        )"#,
    )
    .unwrap();

    let mut director = Director::headless(Viewport::new(800.0, 600.0, 1.0));
    let a = director.add_scene(CountingScene::new("a"));
    let b = director.add_scene(CountingScene::new("b"));
    director.run_scene(a).unwrap();
    director.transition_to(b, preset.to_transition().unwrap()).unwrap();

    let transition = director.transition().unwrap();
    assert_eq!(transition.effect(), TransitionEffect::Fade);
    assert_eq!(
        director.transition_layers().unwrap().incoming().target().content_scale(),
        0.5
    );

    director.update(0.1).unwrap();
    assert!(director.update(0.1).unwrap());
    assert_eq!(director.active_scene_key(), Some(b));
}
