use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fastrand::Rng;
use gloo_events::EventListener;
use gloo_render::{request_animation_frame, AnimationFrame};
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

use crate::config::ParticleConfig;
use crate::dom;
use crate::error::{Result, SiteError};
use crate::render::{
    CanvasRenderer, ParticleCloud, PerspectiveCamera, PointRenderer, PointStyle, Rotation,
};

/// The cloud, the camera looking at it and the surface it is drawn on.
pub struct ParticleScene<R> {
    cloud: ParticleCloud,
    camera: PerspectiveCamera,
    renderer: R,
    step: Rotation,
    frames: u64,
}

impl<R: PointRenderer> ParticleScene<R> {
    pub fn new(
        config: &ParticleConfig,
        rng: &mut Rng,
        renderer: R,
        width: f64,
        height: f64,
    ) -> Self {
        let aspect = if height > 0.0 { width / height } else { 1.0 };
        let mut scene = Self {
            cloud: ParticleCloud::generate(config.count, config.spread, rng),
            camera: PerspectiveCamera::new(
                config.fov_degrees,
                aspect,
                config.near,
                config.far,
                config.camera_z,
            ),
            renderer,
            step: Rotation {
                x: config.rotation_step_x,
                y: config.rotation_step_y,
            },
            frames: 0,
        };
        scene.resize(width, height);
        scene
    }

    /// Advances the drift by one step and redraws.
    pub fn frame(&mut self) {
        self.cloud.rotate(self.step);
        self.frames += 1;
        self.renderer.render(&self.cloud, &self.camera);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.set_aspect(width, height);
        self.renderer.set_size(width, height);
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

/// Runs a callback on every animation frame until stopped or dropped.
pub struct FrameLoop {
    slot: FrameSlot,
    stopped: Rc<Cell<bool>>,
}

impl FrameLoop {
    pub fn start<F>(on_frame: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        let stopped = Rc::new(Cell::new(false));
        let on_frame: Rc<RefCell<dyn FnMut()>> = Rc::new(RefCell::new(on_frame));
        schedule(slot.clone(), stopped.clone(), on_frame);
        Self { slot, stopped }
    }

    pub fn stop(&self) {
        self.stopped.set(true);
        self.slot.borrow_mut().take();
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule(slot: FrameSlot, stopped: Rc<Cell<bool>>, on_frame: Rc<RefCell<dyn FnMut()>>) {
    if stopped.get() {
        return;
    }
    let next = slot.clone();
    let handle = request_animation_frame(move |_| {
        next.borrow_mut().take();
        if stopped.get() {
            return;
        }
        (&mut *on_frame.borrow_mut())();
        schedule(next, stopped, on_frame);
    });
    *slot.borrow_mut() = Some(handle);
}

pub struct ParticleBackground {
    _frames: FrameLoop,
    _resize: EventListener,
}

impl ParticleBackground {
    pub fn attach(window: &Window, document: &Document, config: &ParticleConfig) -> Result<Self> {
        let canvas = document
            .get_element_by_id(&config.canvas_id)
            .ok_or_else(|| SiteError::missing(&format!("#{}", config.canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SiteError::missing(&format!("canvas#{}", config.canvas_id)))?;

        let pixel_ratio = window.device_pixel_ratio().min(config.max_pixel_ratio);
        let style = PointStyle {
            color: config.color.clone(),
            size: config.size,
            opacity: config.opacity,
        };
        let renderer = CanvasRenderer::new(canvas, style, pixel_ratio)?;

        let (width, height) = dom::viewport_size(window);
        let mut rng = Rng::with_seed(dom::entropy_seed());
        let scene = Rc::new(RefCell::new(ParticleScene::new(
            config, &mut rng, renderer, width, height,
        )));

        let frames = {
            let scene = scene.clone();
            FrameLoop::start(move || scene.borrow_mut().frame())
        };

        let resize = {
            let viewport = window.clone();
            EventListener::new(window, "resize", move |_| {
                let (width, height) = dom::viewport_size(&viewport);
                scene.borrow_mut().resize(width, height);
            })
        };

        debug!(
            "Particle background running with {} points at {}x{}",
            config.count, width, height
        );

        Ok(Self {
            _frames: frames,
            _resize: resize,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::*;

    #[derive(Default)]
    struct RecordingRenderer {
        renders: usize,
        sizes: Vec<(f64, f64)>,
        last_rotation: Option<Rotation>,
    }

    impl PointRenderer for RecordingRenderer {
        fn set_size(&mut self, width: f64, height: f64) {
            self.sizes.push((width, height));
        }

        fn render(&mut self, cloud: &ParticleCloud, _camera: &PerspectiveCamera) {
            self.renders += 1;
            self.last_rotation = Some(cloud.rotation());
        }
    }

    fn scene() -> ParticleScene<RecordingRenderer> {
        let mut rng = Rng::with_seed(99);
        ParticleScene::new(
            &ParticleConfig::default(),
            &mut rng,
            RecordingRenderer::default(),
            1280.0,
            720.0,
        )
    }

    #[test]
    fn scene_starts_with_default_cloud_and_sized_surface() {
        let scene = scene();
        assert_eq!(scene.cloud().len(), 1500);
        assert_eq!(scene.renderer.sizes, vec![(1280.0, 720.0)]);
        assert!((scene.camera().aspect() - 1280.0 / 720.0).abs() < 1e-12);
        assert_eq!(scene.cloud().rotation(), Rotation::default());
    }

    #[test]
    fn each_frame_rotates_then_renders() {
        let mut scene = scene();
        let n = 1000;
        for _ in 0..n {
            scene.frame();
        }

        let rotation = scene.cloud().rotation();
        assert_eq!(scene.frames(), n);
        assert_eq!(scene.renderer.renders, n as usize);
        assert_eq!(scene.renderer.last_rotation, Some(rotation));
        assert!((rotation.y - (n as f64 * 0.0005).rem_euclid(TAU)).abs() < 1e-9);
        assert!((rotation.x - (n as f64 * 0.0002).rem_euclid(TAU)).abs() < 1e-9);
    }

    #[test]
    fn points_do_not_move_between_frames() {
        let mut scene = scene();
        let before = scene.cloud().positions().to_vec();
        scene.frame();
        scene.frame();
        assert_eq!(scene.cloud().positions(), before.as_slice());
    }

    #[test]
    fn resize_updates_camera_before_next_frame() {
        let mut scene = scene();
        scene.resize(600.0, 800.0);
        assert!((scene.camera().aspect() - 0.75).abs() < 1e-12);
        assert_eq!(scene.renderer.sizes.last(), Some(&(600.0, 800.0)));

        scene.frame();
        assert_eq!(scene.renderer.renders, 1);
    }
}
