//! Segue - scene transitions for 2D engines
//!
//! The transition engine lives in `segue_core`; this crate adds layered
//! configuration and a headless demo that drives a [`Director`].

pub mod config;
pub mod demo;

pub use config::{AppConfig, ConfigError};
pub use demo::{ColorScene, Demo, DemoError, DemoReport};

pub use segue_core::{
    Director, Host, Scene, Transition, TransitionEffect, TransitionPreset, TransitionSettings,
    Viewport,
};
