use crate::demo::DemoState;

/// Advances the demo by one frame and brings world matrices up to date.
pub fn update(state: &mut DemoState) {
    state.scene.early_update();
    state.update();
    state.scene.late_update();
}
