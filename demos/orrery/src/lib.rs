use wasm_bindgen::prelude::*;
use orrery_engine::*;

pub mod asteroids;
pub mod bodies;
pub mod comets;
pub mod config;
pub mod game;
pub mod resonance;
pub mod spaceships;
pub mod starfield;
pub mod theme;
pub mod world;
use game::Orrery;

orrery_web::export_game!(Orrery, "celestial-orrery");
