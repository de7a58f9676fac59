use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{camera::PerspectiveCamera, demo::DemoState, engine, scene_graph::Scene};

/// Shared flag that ends the frame loop at the next tick.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Whatever decides when the next frame happens.
pub trait FrameHost {
    fn request_frame(&mut self);
}

pub trait SceneDrawer {
    type Error;

    fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

pub struct FrameLoop {
    stop: StopSignal,
    frames: u64,
}

impl FrameLoop {
    pub fn new(stop: StopSignal) -> Self {
        Self { stop, frames: 0 }
    }

    pub fn stop_signal(&self) -> &StopSignal {
        &self.stop
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One frame: schedule the next one, spin, draw.
    ///
    /// The next frame is requested before drawing, so a failed draw still
    /// leaves the loop running.
    pub fn tick<H, D>(
        &mut self,
        state: &mut DemoState,
        host: &mut H,
        drawer: &mut D,
    ) -> Result<FrameStatus, D::Error>
    where
        H: FrameHost,
        D: SceneDrawer,
    {
        if self.stop.is_stopped() {
            log::debug!("Frame loop stopped after {} frames", self.frames);
            return Ok(FrameStatus::Stopped);
        }

        host.request_frame();
        engine::update(state);
        self.frames += 1;

        drawer.draw(&state.scene, &state.camera)?;

        Ok(FrameStatus::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use glam::Vec3;
    use winit::dpi::PhysicalSize;

    #[derive(Default)]
    struct CountingHost {
        requests: u32,
    }

    impl FrameHost for CountingHost {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    #[derive(Default)]
    struct RecordingDrawer {
        draws: Vec<(usize, f32)>,
        fail: bool,
    }

    impl SceneDrawer for RecordingDrawer {
        type Error = &'static str;

        fn draw(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), Self::Error> {
            if self.fail {
                return Err("surface lost");
            }
            self.draws.push((scene.len(), camera.aspect()));
            Ok(())
        }
    }

    fn demo() -> DemoState {
        DemoState::new(PhysicalSize::new(800, 600), &SceneConfig::default())
    }

    #[test]
    fn each_tick_reschedules_and_draws() {
        let mut state = demo();
        let mut frame_loop = FrameLoop::new(StopSignal::new());
        let mut host = CountingHost::default();
        let mut drawer = RecordingDrawer::default();

        for _ in 0..3 {
            let status = frame_loop.tick(&mut state, &mut host, &mut drawer);
            assert_eq!(status, Ok(FrameStatus::Continue));
        }

        assert_eq!(host.requests, 3);
        assert_eq!(drawer.draws.len(), 3);
        assert_eq!(drawer.draws[0].0, 5);
        assert_eq!(frame_loop.frames(), 3);
    }

    #[test]
    fn stop_signal_halts_without_rescheduling() {
        let mut state = demo();
        let stop = StopSignal::new();
        let mut frame_loop = FrameLoop::new(stop.clone());
        let mut host = CountingHost::default();
        let mut drawer = RecordingDrawer::default();

        frame_loop.tick(&mut state, &mut host, &mut drawer).unwrap();
        stop.stop();

        let status = frame_loop.tick(&mut state, &mut host, &mut drawer);
        assert_eq!(status, Ok(FrameStatus::Stopped));
        assert_eq!(host.requests, 1);
        assert_eq!(drawer.draws.len(), 1);
        assert_eq!(state.spin.frames(), 1);
    }

    #[test]
    fn failed_draw_is_already_rescheduled() {
        let mut state = demo();
        let mut frame_loop = FrameLoop::new(StopSignal::new());
        let mut host = CountingHost::default();
        let mut drawer = RecordingDrawer {
            fail: true,
            ..Default::default()
        };

        let status = frame_loop.tick(&mut state, &mut host, &mut drawer);
        assert_eq!(status, Err("surface lost"));
        assert_eq!(host.requests, 1);
    }

    #[test]
    fn ticks_keep_world_matrices_in_step() {
        let mut state = demo();
        let mut frame_loop = FrameLoop::new(StopSignal::new());
        let mut host = CountingHost::default();
        let mut drawer = RecordingDrawer::default();

        for _ in 0..1000 {
            frame_loop.tick(&mut state, &mut host, &mut drawer).unwrap();
        }

        let polyhedron = state.scene.get_object_transform(state.polyhedron()).unwrap();
        let outline = state.scene.get_object_transform(state.outline()).unwrap();
        assert_eq!(polyhedron.rotation(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(*polyhedron.get_world_matrix(), *outline.get_world_matrix());
    }

    #[test]
    fn aspect_is_fixed_across_frames() {
        let mut state = demo();
        let mut frame_loop = FrameLoop::new(StopSignal::new());
        let mut host = CountingHost::default();
        let mut drawer = RecordingDrawer::default();

        for _ in 0..10 {
            frame_loop.tick(&mut state, &mut host, &mut drawer).unwrap();
        }

        assert!(drawer
            .draws
            .iter()
            .all(|&(_, aspect)| aspect == 800.0 / 600.0));
    }
}
