//! An in-memory [`Container`] that records every call.
//!
//! Lets headless code and tests drive any backend and inspect what it issued. Capabilities can
//! be switched off to exercise the placeholder path.

use crate::draw::DrawOp;
use crate::error::{Error, Result};
use crate::gpu::Batch;
use crate::renderer::{Container, GpuDevice, LayerSpec, SceneHost, Surface};
use crate::scene::ScenePatch;
use std::cell::RefCell;
use std::rc::Rc;
use trellis_core::geom::{DiagramSpace, SurfaceSpace};

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRecord {
    pub spec: LayerSpec,
    pub clears: usize,
    pub ops: Vec<DrawOp>,
    pub attached: bool,
    pub transform: Option<euclid::Transform2D<f64, DiagramSpace, SurfaceSpace>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordLog {
    pub surfaces: Vec<SurfaceRecord>,
    pub patches: Vec<ScenePatch>,
    pub scene_mounted: bool,
    pub batches: Vec<Batch>,
    pub gpu_clears: usize,
    pub gpu_attached: bool,
    /// Drawing-area size the device was created with or last resized to.
    pub gpu_size: Option<(f64, f64)>,
}

impl RecordLog {
    pub fn surface(&self, name: &str) -> Option<&SurfaceRecord> {
        self.surfaces.iter().rev().find(|s| s.spec.name == name)
    }

    pub fn attached_surfaces(&self) -> usize {
        self.surfaces.iter().filter(|s| s.attached).count()
    }

    pub fn total_ops(&self) -> usize {
        self.surfaces.iter().map(|s| s.ops.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct RecordingContainer {
    pub log: Rc<RefCell<RecordLog>>,
    pub surfaces: bool,
    pub scene: bool,
    pub gpu: bool,
    /// Backing pixels per on-screen pixel reported by created surfaces.
    pub pixel_ratio: f64,
    /// Whether created surfaces and devices accept `resize`.
    pub resizable: bool,
}

impl Default for RecordingContainer {
    fn default() -> Self {
        Self {
            log: Rc::default(),
            surfaces: true,
            scene: true,
            gpu: true,
            pixel_ratio: 1.0,
            resizable: true,
        }
    }
}

impl RecordingContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container that offers only 2D surfaces.
    pub fn surfaces_only() -> Self {
        Self {
            scene: false,
            gpu: false,
            ..Self::default()
        }
    }

    /// A container that offers nothing at all.
    pub fn empty() -> Self {
        Self {
            surfaces: false,
            scene: false,
            gpu: false,
            ..Self::default()
        }
    }

    pub fn log(&self) -> std::cell::Ref<'_, RecordLog> {
        self.log.borrow()
    }
}

impl Container for RecordingContainer {
    fn create_surface(&mut self, spec: LayerSpec) -> Result<Box<dyn Surface>> {
        if !self.surfaces {
            return Err(Error::Unsupported {
                capability: "2d surfaces",
            });
        }
        let mut log = self.log.borrow_mut();
        log.surfaces.push(SurfaceRecord {
            spec: spec.clone(),
            clears: 0,
            ops: Vec::new(),
            attached: true,
            transform: None,
        });
        Ok(Box::new(RecordingSurface {
            log: Rc::clone(&self.log),
            index: log.surfaces.len() - 1,
            backing: (spec.width * self.pixel_ratio, spec.height * self.pixel_ratio),
            pixel_ratio: self.pixel_ratio,
            resizable: self.resizable,
        }))
    }

    fn mount_scene(&mut self) -> Result<Box<dyn SceneHost>> {
        if !self.scene {
            return Err(Error::Unsupported {
                capability: "scene graphs",
            });
        }
        self.log.borrow_mut().scene_mounted = true;
        Ok(Box::new(RecordingScene {
            log: Rc::clone(&self.log),
        }))
    }

    fn create_gpu_device(&mut self, width: f64, height: f64) -> Result<Box<dyn GpuDevice>> {
        if !self.gpu {
            return Err(Error::Device {
                message: "no adapter".to_string(),
            });
        }
        let mut log = self.log.borrow_mut();
        log.gpu_attached = true;
        log.gpu_size = Some((width, height));
        Ok(Box::new(RecordingDevice {
            log: Rc::clone(&self.log),
            resizable: self.resizable,
        }))
    }
}

struct RecordingSurface {
    log: Rc<RefCell<RecordLog>>,
    index: usize,
    backing: (f64, f64),
    pixel_ratio: f64,
    resizable: bool,
}

impl RecordingSurface {
    fn with<R>(&self, f: impl FnOnce(&mut SurfaceRecord) -> R) -> Option<R> {
        self.log.borrow_mut().surfaces.get_mut(self.index).map(f)
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.with(|s| {
            s.clears += 1;
            s.ops.clear();
        });
    }

    fn draw(&mut self, op: &DrawOp) {
        self.with(|s| s.ops.push(op.clone()));
    }

    fn backing_size(&self) -> Option<(f64, f64)> {
        Some(self.backing)
    }

    fn set_transform(&mut self, transform: &euclid::Transform2D<f64, DiagramSpace, SurfaceSpace>) {
        self.with(|s| s.transform = Some(*transform));
    }

    fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !self.resizable {
            return Err(Error::Unsupported {
                capability: "surface resize",
            });
        }
        self.backing = (width * self.pixel_ratio, height * self.pixel_ratio);
        self.with(|s| {
            s.spec.width = width;
            s.spec.height = height;
            s.ops.clear();
            s.transform = None;
        });
        Ok(())
    }

    fn detach(&mut self) {
        self.with(|s| s.attached = false);
    }
}

struct RecordingScene {
    log: Rc<RefCell<RecordLog>>,
}

impl SceneHost for RecordingScene {
    fn apply(&mut self, patches: &[ScenePatch]) {
        self.log.borrow_mut().patches.extend_from_slice(patches);
    }

    fn unmount(&mut self) {
        self.log.borrow_mut().scene_mounted = false;
    }
}

struct RecordingDevice {
    log: Rc<RefCell<RecordLog>>,
    resizable: bool,
}

impl GpuDevice for RecordingDevice {
    fn clear(&mut self, _color: [f32; 4]) {
        self.log.borrow_mut().gpu_clears += 1;
    }

    fn submit(&mut self, batch: &Batch) {
        self.log.borrow_mut().batches.push(batch.clone());
    }

    fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !self.resizable {
            return Err(Error::Device {
                message: "swap chain cannot be reconfigured".to_string(),
            });
        }
        self.log.borrow_mut().gpu_size = Some((width, height));
        Ok(())
    }

    fn release(&mut self) {
        self.log.borrow_mut().gpu_attached = false;
    }
}
