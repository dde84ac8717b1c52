// F2 tears the particle field down or brings it back up.

use bevy::prelude::*;
use hx_core::{FieldMountRequest, InputSet};
use hx_rendering::FieldHost;

pub const TOGGLE_FIELD_KEY: KeyCode = KeyCode::F2;

pub struct FieldKeysPlugin;

impl Plugin for FieldKeysPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, toggle_field.before(InputSet));
    }
}

fn toggle_field(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    host: Option<Res<FieldHost>>,
    mut requests: EventWriter<FieldMountRequest>,
) {
    let (Some(keys), Some(host)) = (keys, host) else {
        return;
    };
    if !keys.just_pressed(TOGGLE_FIELD_KEY) {
        return;
    }
    let request = if host.is_mounted() {
        FieldMountRequest::Unmount
    } else {
        FieldMountRequest::Mount
    };
    info!(?request, "Field toggle key");
    requests.write(request);
}
