//! Declarative scene-graph backend.
//!
//! The frame is kept as a keyed tree ([`Scene`]). Each render diffs the new tree against the
//! retained one and sends the host only the resizes, inserts, updates and removals.

use crate::cache::RenderCache;
use crate::draw::{DisplayList, DrawOp, Layer, SceneKey, build_display_list};
use crate::renderer::{
    Container, RenderOutcome, Renderer, RendererKind, RendererStatus, SceneHost, Surface,
    redraw_placeholder, show_placeholder,
};
use crate::props::RenderProps;
use indexmap::IndexMap;
use std::time::Instant;
use trellis_core::RenderConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub layer: Layer,
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScenePatch {
    Insert { key: SceneKey, node: SceneNode },
    Update { key: SceneKey, node: SceneNode },
    Remove { key: SceneKey },
    /// The drawing area changed size. Always sent before any node patch of the same frame.
    Resize { width: f64, height: f64 },
}

impl ScenePatch {
    /// The node a patch touches; `None` for [`ScenePatch::Resize`].
    pub fn key(&self) -> Option<&SceneKey> {
        match self {
            ScenePatch::Insert { key, .. }
            | ScenePatch::Update { key, .. }
            | ScenePatch::Remove { key } => Some(key),
            ScenePatch::Resize { .. } => None,
        }
    }
}

/// A retained frame: nodes keyed by identity, in draw order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub nodes: IndexMap<SceneKey, SceneNode>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            nodes: IndexMap::new(),
        }
    }

    /// Groups display items by key. A key's first item decides its layer.
    pub fn from_display_list(list: &DisplayList, width: f64, height: f64) -> Self {
        let mut scene = Self::new(width, height);
        for item in &list.items {
            scene
                .nodes
                .entry(item.key.clone())
                .or_insert_with(|| SceneNode {
                    layer: item.layer,
                    ops: Vec::new(),
                })
                .ops
                .push(item.op.clone());
        }
        scene
    }

    pub fn build(props: &RenderProps, cfg: &RenderConfig) -> Self {
        let list = build_display_list(props, cfg);
        Self::from_display_list(&list, props.viewport.width, props.viewport.height)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, key: &SceneKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Patches that turn `self` into `next`: a resize if the size differs, removals, then
    /// inserts and updates in `next`'s order.
    pub fn diff(&self, next: &Scene) -> Vec<ScenePatch> {
        let mut patches = Vec::new();
        if (self.width, self.height) != (next.width, next.height) {
            patches.push(ScenePatch::Resize {
                width: next.width,
                height: next.height,
            });
        }
        patches.extend(
            self.nodes
                .keys()
                .filter(|key| !next.nodes.contains_key(*key))
                .map(|key| ScenePatch::Remove { key: key.clone() }),
        );

        for (key, node) in &next.nodes {
            match self.nodes.get(key) {
                None => patches.push(ScenePatch::Insert {
                    key: key.clone(),
                    node: node.clone(),
                }),
                Some(old) if old != node => patches.push(ScenePatch::Update {
                    key: key.clone(),
                    node: node.clone(),
                }),
                Some(_) => {}
            }
        }
        patches
    }

    /// Node ops grouped by layer in z order, preserving draw order within a layer.
    pub fn layers(&self) -> impl Iterator<Item = (Layer, Vec<&DrawOp>)> + '_ {
        Layer::ALL.into_iter().map(move |layer| {
            let ops = self
                .nodes
                .values()
                .filter(|node| node.layer == layer)
                .flat_map(|node| node.ops.iter())
                .collect();
            (layer, ops)
        })
    }

    pub fn to_svg(&self) -> String {
        crate::svg::render_scene(self)
    }
}

pub struct SceneRenderer {
    config: RenderConfig,
    cache: RenderCache,
    status: RendererStatus,
    host: Option<Box<dyn SceneHost>>,
    placeholder: Option<Box<dyn Surface>>,
    scene: Scene,
}

impl SceneRenderer {
    pub fn new(config: RenderConfig, cache: RenderCache) -> Self {
        Self {
            config,
            cache,
            status: RendererStatus::Detached,
            host: None,
            placeholder: None,
            scene: Scene::default(),
        }
    }

    /// The tree the host currently shows.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }
}

impl Renderer for SceneRenderer {
    fn kind(&self) -> RendererKind {
        RendererKind::Scene
    }

    fn status(&self) -> &RendererStatus {
        &self.status
    }

    fn initialize(
        &mut self,
        container: &mut dyn Container,
        width: f64,
        height: f64,
    ) -> RendererStatus {
        self.cleanup();
        match container.mount_scene() {
            Ok(host) => {
                self.host = Some(host);
                self.scene = Scene::new(width, height);
                self.status = RendererStatus::Ready;
                tracing::debug!(width, height, "scene renderer ready");
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(%reason, "scene renderer unavailable");
                self.placeholder = show_placeholder(container, width, height, &reason, &self.config);
                self.status = RendererStatus::Placeholder { reason };
            }
        }
        self.status.clone()
    }

    fn render(&mut self, props: &RenderProps) -> RenderOutcome {
        let Some(host) = self.host.as_mut() else {
            return RenderOutcome::Unavailable;
        };
        let now = Instant::now();
        if !self.cache.should_render(props, now) {
            tracing::trace!("scene unchanged; skipped");
            return RenderOutcome::Skipped;
        }

        let next = Scene::build(props, &self.config);
        let patches = self.scene.diff(&next);
        if !patches.is_empty() {
            host.apply(&patches);
        }
        self.scene = next;
        self.cache.commit(props.clone(), now);
        RenderOutcome::Drawn {
            primitives: patches.len(),
        }
    }

    fn cleanup(&mut self) {
        if let Some(mut host) = self.host.take() {
            host.unmount();
        }
        if let Some(mut placeholder) = self.placeholder.take() {
            placeholder.detach();
        }
        self.scene = Scene::default();
        self.cache.invalidate();
        self.status = RendererStatus::Detached;
    }

    fn resize(&mut self, width: f64, height: f64) -> RendererStatus {
        self.cache.invalidate();
        if let Some(host) = self.host.as_mut() {
            if (self.scene.width, self.scene.height) != (width, height) {
                host.apply(&[ScenePatch::Resize { width, height }]);
                self.scene.width = width;
                self.scene.height = height;
            }
        } else if let (Some(placeholder), RendererStatus::Placeholder { reason }) =
            (self.placeholder.as_mut(), &self.status)
        {
            redraw_placeholder(placeholder.as_mut(), width, height, reason, &self.config);
        }
        self.status.clone()
    }

    fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}
