//! Browser glue: a [`GameRunner`] driving an `orrery_engine::Game` plus the
//! `#[wasm_bindgen]` surface the host page calls each frame.

pub mod runner;

pub use runner::{GameRunner, RESIZE_EVENT};

/// Declares `#[wasm_bindgen]` getters that forward to a `GameRunner` method.
#[doc(hidden)]
#[macro_export]
macro_rules! runner_getters {
    ($($export:ident => $method:ident -> $ret:ty;)*) => {
        $(
            #[wasm_bindgen]
            pub fn $export() -> $ret {
                with_runner(|r| r.$method())
            }
        )*
    };
}

/// Declares `#[wasm_bindgen]` input entry points that queue one `InputEvent`.
#[doc(hidden)]
#[macro_export]
macro_rules! runner_inputs {
    ($($export:ident($($arg:ident: $ty:ty),*) => $event:expr;)*) => {
        $(
            #[wasm_bindgen]
            pub fn $export($($arg: $ty),*) {
                with_runner(|r| r.push_input($event));
            }
        )*
    };
}

/// Expands to the full wasm export surface for one game type.
///
/// The caller must have `wasm_bindgen::prelude::*` and
/// `orrery_engine::InputEvent` in scope, and `$game_type` must provide `new()`.
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use orrery_engine::*;
///
/// mod game;
/// orrery_web::export_game!(game::Orrery, "celestial-orrery");
/// ```
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut slot = cell.borrow_mut();
                let runner = slot.as_mut().expect("game_init() must run before any other export");
                f(runner)
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some($crate::GameRunner::new(<$game_type>::new()));
            });
            with_runner(|r| r.init());
            log::info!("{} ready", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_load_config(json: &str) {
            with_runner(|r| r.load_config(json));
        }

        $crate::runner_inputs! {
            game_pointer_down(x: f32, y: f32) => InputEvent::PointerDown { x, y };
            game_pointer_up(x: f32, y: f32) => InputEvent::PointerUp { x, y };
            game_pointer_move(x: f32, y: f32) => InputEvent::PointerMove { x, y };
            game_wheel(delta: f32) => InputEvent::Wheel { delta };
            game_key_down(key_code: u32) => InputEvent::KeyDown { key_code };
            game_key_up(key_code: u32) => InputEvent::KeyUp { key_code };
            game_custom_event(kind: u32, a: f32, b: f32, c: f32) => InputEvent::Custom { kind, a, b, c };
            game_resize(width: f32, height: f32) =>
                InputEvent::Custom { kind: $crate::RESIZE_EVENT, a: width, b: height, c: 0.0 };
        }

        $crate::runner_getters! {
            get_header_ptr => header_ptr -> *const f32;
            get_camera_ptr => camera_ptr -> *const f32;
            get_sdf_instances_ptr => sdf_instances_ptr -> *const f32;
            get_sdf_instance_count => sdf_instance_count -> u32;
            get_points_ptr => points_ptr -> *const f32;
            get_point_count => point_count -> u32;
            get_effects_ptr => effects_ptr -> *const f32;
            get_effects_vertex_count => effects_vertex_count -> u32;
            get_vector_vertices_ptr => vector_vertices_ptr -> *const f32;
            get_vector_vertex_count => vector_vertex_count -> u32;
            get_lights_ptr => lights_ptr -> *const f32;
            get_light_count => light_count -> u32;
            get_game_events_ptr => game_events_ptr -> *const f32;
            get_game_events_len => game_events_len -> u32;
            get_world_width => world_width -> f32;
            get_world_height => world_height -> f32;
            get_elapsed => elapsed -> f32;
            get_time_scale => time_scale -> f32;

            get_bloom_strength => bloom_strength -> f32;
            get_bloom_radius => bloom_radius -> f32;
            get_bloom_threshold => bloom_threshold -> f32;
            get_exposure => exposure -> f32;
            get_tone_mapping => tone_mapping -> bool;

            get_max_sdf_instances => max_sdf_instances -> u32;
            get_max_points => max_points -> u32;
            get_max_effects_vertices => max_effects_vertices -> u32;
            get_max_vector_vertices => max_vector_vertices -> u32;
            get_max_lights => max_lights -> u32;
            get_max_events => max_events -> u32;
            get_buffer_total_floats => buffer_total_floats -> u32;
        }
    };
}
