//! Headless demo
//!
//! Cycles a [`Director`] through a ring of solid-color scenes, blending each
//! into the next with the configured transition. Frames are simulated at a
//! fixed rate so the run is deterministic.

use segue_core::{
    Director, DirectorError, HeadlessTarget, QuadVertex, RenderTarget, Scene, SceneKey,
    SettingsError, TransitionEffect,
};
use segue_math::{mat4, Color, Mat4, Size};

use crate::config::AppConfig;

/// A scene that fills the viewport with one color
pub struct ColorScene {
    name: String,
    color: Color,
    size: Size,
    paused: bool,
    /// Frames drawn while not paused
    ticks: u32,
    /// Total draw traversals
    draws: u32,
}

impl ColorScene {
    pub fn new(name: impl Into<String>, color: Color, size: Size) -> Self {
        Self {
            name: name.into(),
            color,
            size,
            paused: false,
            ticks: 0,
            draws: 0,
        }
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn draws(&self) -> u32 {
        self.draws
    }
}

impl Scene for ColorScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_enter(&mut self) {
        log::debug!("'{}' entered", self.name);
    }

    fn on_exit(&mut self) {
        log::debug!("'{}' exited", self.name);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn background_color(&self) -> Color {
        self.color
    }

    fn projection(&self) -> Mat4 {
        mat4::orthographic_2d(self.size.width, self.size.height)
    }

    fn visit(&mut self, target: &mut dyn RenderTarget) {
        self.draws += 1;
        if !self.paused {
            self.ticks += 1;
        }

        let (w, h) = (self.size.width, self.size.height);
        let vertex = |x: f32, y: f32, u: f32, v: f32| QuadVertex {
            position: [x, y],
            uv: [u, v],
            opacity: self.color.a,
            _padding: [0.0; 3],
        };
        target.draw(&[
            vertex(0.0, 0.0, 0.0, 1.0),
            vertex(w, 0.0, 1.0, 1.0),
            vertex(w, h, 1.0, 0.0),
            vertex(0.0, h, 0.0, 0.0),
        ]);
    }
}

/// Summary of a demo run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoReport {
    /// Frames simulated across all transitions
    pub frames: u32,
    /// Completed handovers
    pub handovers: u32,
}

/// Error from a demo run
#[derive(Debug)]
pub enum DemoError {
    /// The configured transition is invalid
    Settings(SettingsError),
    /// The director rejected an operation
    Director(DirectorError),
    /// The frame rate is not a positive finite number
    InvalidFrameRate(f32),
    /// A transition did not finish within the frame cap
    Stalled { frames: u32 },
}

impl From<SettingsError> for DemoError {
    fn from(e: SettingsError) -> Self {
        DemoError::Settings(e)
    }
}

impl From<DirectorError> for DemoError {
    fn from(e: DirectorError) -> Self {
        DemoError::Director(e)
    }
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Settings(e) => write!(f, "Invalid transition settings: {}", e),
            DemoError::Director(e) => write!(f, "Director error: {}", e),
            DemoError::InvalidFrameRate(fps) => write!(f, "Invalid frame rate: {}", fps),
            DemoError::Stalled { frames } => {
                write!(f, "Transition did not finish after {} frames", frames)
            }
        }
    }
}

impl std::error::Error for DemoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DemoError::Settings(e) => Some(e),
            DemoError::Director(e) => Some(e),
            _ => None,
        }
    }
}

const PALETTE: [Color; 4] = [
    Color::new(0.8, 0.2, 0.2, 1.0),
    Color::new(0.2, 0.7, 0.3, 1.0),
    Color::new(0.2, 0.3, 0.8, 1.0),
    Color::new(0.9, 0.8, 0.2, 1.0),
];

/// Drives a headless director through a ring of scenes
pub struct Demo {
    config: AppConfig,
    director: Director<HeadlessTarget>,
    scenes: Vec<SceneKey>,
}

impl Demo {
    /// Build the director and its scenes from configuration
    pub fn new(config: AppConfig) -> Result<Self, DemoError> {
        let viewport = config.viewport.to_viewport();
        let mut director = Director::headless(viewport)
            .with_cleanup_on_exit(config.director.cleanup_on_exit);

        let count = config.demo.scene_count.max(2) as usize;
        let scenes: Vec<SceneKey> = (0..count)
            .map(|i| {
                let scene = ColorScene::new(
                    format!("scene_{}", i),
                    PALETTE[i % PALETTE.len()],
                    viewport.size(),
                );
                director.add_scene(scene)
            })
            .collect();

        director.run_scene(scenes[0])?;
        Ok(Self { config, director, scenes })
    }

    pub fn director(&self) -> &Director<HeadlessTarget> {
        &self.director
    }

    pub fn scenes(&self) -> &[SceneKey] {
        &self.scenes
    }

    /// Transition through every scene once, ending back at the first
    pub fn run(&mut self) -> Result<DemoReport, DemoError> {
        let fps = self.config.demo.frame_rate;
        if !(fps.is_finite() && fps > 0.0) {
            return Err(DemoError::InvalidFrameRate(fps));
        }
        let dt = 1.0 / fps;
        // Generous cap so a zero-progress loop cannot spin forever
        let max_frames = (self.config.transition.duration * fps).ceil() as u32 + 2;

        let mut report = DemoReport::default();
        let order: Vec<SceneKey> = self.scenes[1..]
            .iter()
            .chain(std::iter::once(&self.scenes[0]))
            .copied()
            .collect();

        for next in order {
            let transition = self.config.transition.to_transition()?;
            self.director.transition_to(next, transition)?;
            log::info!(
                "Transition to '{}' ({}, {:.2}s)",
                self.scene_name(next),
                effect_label(self.config.transition.effect),
                self.config.transition.duration
            );

            let mut frames = 0;
            loop {
                frames += 1;
                if self.director.update(dt)? {
                    break;
                }
                if frames >= max_frames {
                    return Err(DemoError::Stalled { frames });
                }
                if let Some(transition) = self.director.transition() {
                    log::trace!("frame {}: progress {:.3}", frames, transition.progress());
                }
            }

            report.frames += frames;
            report.handovers += 1;
            log::info!("'{}' is active after {} frames", self.scene_name(next), frames);
        }

        Ok(report)
    }

    fn scene_name(&self, key: SceneKey) -> &str {
        self.director.scene(key).map(|s| s.name()).unwrap_or("<removed>")
    }
}

/// Short label for an effect, used in log output
pub fn effect_label(effect: TransitionEffect) -> &'static str {
    match effect {
        TransitionEffect::Crossfade => "crossfade",
        TransitionEffect::Fade => "fade",
        TransitionEffect::Slide { .. } => "slide",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_core::{HeadlessTarget, PixelSize};

    fn config(scene_count: u32, duration: f32) -> AppConfig {
        let mut config = AppConfig::default();
        config.demo.scene_count = scene_count;
        config.demo.frame_rate = 10.0;
        config.transition.duration = duration;
        config
    }

    #[test]
    fn test_color_scene_draws_full_quad() {
        let mut scene = ColorScene::new("red", Color::WHITE, Size::new(64.0, 32.0));
        let mut target = HeadlessTarget::new(PixelSize::new(64, 32));
        target.begin_with_clear(scene.background_color());
        scene.visit(&mut target);
        target.end();
        assert_eq!(target.vertices_drawn(), 4);
        assert_eq!(scene.draws(), 1);
        assert_eq!(scene.ticks(), 1);
    }

    #[test]
    fn test_color_scene_projection_reaches_target() {
        let config = config(2, 0.45);
        let mut demo = Demo::new(config).unwrap();
        let next = demo.scenes()[1];
        let transition = demo.config.transition.to_transition().unwrap();
        demo.director.transition_to(next, transition).unwrap();

        let layers = demo.director().transition_layers().unwrap();
        assert_eq!(
            layers.incoming().target().projection(),
            mat4::orthographic_2d(1280.0, 720.0)
        );
    }

    #[test]
    fn test_paused_scene_does_not_tick() {
        let mut scene = ColorScene::new("red", Color::WHITE, Size::new(1.0, 1.0));
        let mut target = HeadlessTarget::new(PixelSize::new(1, 1));
        scene.set_paused(true);
        scene.visit(&mut target);
        assert_eq!(scene.draws(), 1);
        assert_eq!(scene.ticks(), 0);
    }

    #[test]
    fn test_demo_cycles_back_to_first_scene() {
        let mut demo = Demo::new(config(3, 0.45)).unwrap();
        let first = demo.scenes()[0];
        let report = demo.run().unwrap();

        assert_eq!(report.handovers, 3);
        assert_eq!(demo.director().active_scene_key(), Some(first));
        assert!(!demo.director().is_transitioning());
        // 0.45s at 10fps finishes on the fifth frame of each transition
        assert_eq!(report.frames, 15);
    }

    #[test]
    fn test_demo_needs_two_scenes() {
        let demo = Demo::new(config(1, 0.5)).unwrap();
        assert_eq!(demo.scenes().len(), 2);
    }

    #[test]
    fn test_demo_rejects_bad_frame_rate() {
        let mut config = config(2, 0.5);
        config.demo.frame_rate = 0.0;
        let mut demo = Demo::new(config).unwrap();
        assert!(matches!(demo.run(), Err(DemoError::InvalidFrameRate(_))));
    }

    #[test]
    fn test_demo_rejects_bad_settings() {
        let mut config = config(2, 0.5);
        config.transition.outgoing_down_scale = 8.0;
        let mut demo = Demo::new(config).unwrap();
        assert!(matches!(
            demo.run(),
            Err(DemoError::Settings(SettingsError::DownScaleOutOfRange(_)))
        ));
    }

    #[test]
    fn test_effect_label() {
        assert_eq!(effect_label(TransitionEffect::default()), "crossfade");
    }
}
