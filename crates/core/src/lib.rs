// Core crate: shared ECS vocabulary for the backdrop crates.
// App state, the config wrapper resource, the RNG seed, mount requests and system set labels.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

/// Boot splash first, then the bare field.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Boot sequence playing over the field.
    #[default]
    Boot,
    /// Splash gone; only the field and its overlays remain.
    Field,
}

// Wrapper Bevy resource for the pure-data BackdropConfig (keeps hx_config free of bevy dependency).
#[derive(Resource, Debug, Clone, Default, Deref, DerefMut)]
pub struct BackdropConfigRes(pub hx_config::BackdropConfig);

/// Seed for the field RNG; fixed by config or CLI for reproducible layouts.
#[derive(Resource, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RngSeed(pub u64);

/// Asks the field host to mount or tear down the particle field.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMountRequest {
    Mount,
    Unmount,
}

// System set labels, run in this order every Update.
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub struct InputSet; // pointer, resize and mount requests
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub struct FieldStepSet; // one animator frame
#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub struct PresentSet; // texture uploads and sprite updates

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<StatesPlugin>() {
            app.add_plugins(StatesPlugin);
        }
        app.init_state::<AppState>()
            .add_event::<FieldMountRequest>()
            .init_resource::<BackdropConfigRes>()
            .init_resource::<RngSeed>()
            .configure_sets(Update, (InputSet, FieldStepSet, PresentSet).chain());
    }
}
