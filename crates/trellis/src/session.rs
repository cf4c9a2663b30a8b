use trellis_core::geom::{self, ClientPoint, DiagramPoint, SurfaceTransform, Viewport};
use trellis_core::persist::{self, KeyValueStore};
use trellis_core::{Action, DiagramConfig, DiagramState, InteractionController};
use trellis_layout::{LayoutOptions, LayoutOutcome, LayoutTrigger};
use trellis_render::{
    Container, DebugOptions, PointerEvent, RenderOutcome, RenderProps, Renderer, RendererKind,
    RendererStatus, create_renderer,
};

type Observer = Box<dyn FnMut(&DiagramState)>;

/// One interactive diagram: model, interaction, layout and an optional renderer.
///
/// Single-threaded and event-driven. Every mutation replaces the model state wholesale and
/// notifies observers once per dispatched batch.
pub struct Diagram {
    config: DiagramConfig,
    state: DiagramState,
    controller: InteractionController,
    trigger: LayoutTrigger,
    layout_options: LayoutOptions,
    last_layout: Option<LayoutOutcome>,
    renderer: Option<Box<dyn Renderer>>,
    viewport: Viewport,
    transform: SurfaceTransform,
    debug: DebugOptions,
    observers: Vec<Observer>,
}

impl std::fmt::Debug for Diagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagram")
            .field("state", &self.state)
            .field("viewport", &self.viewport)
            .field("renderer", &self.renderer.as_ref().map(|r| r.kind()))
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl Diagram {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            controller: InteractionController::new(
                config.geometry.clone(),
                config.interaction.clone(),
            ),
            trigger: LayoutTrigger::new(config.layout.relayout),
            layout_options: LayoutOptions::from(&config),
            last_layout: None,
            renderer: None,
            viewport: geom::viewport(800.0, 600.0),
            transform: SurfaceTransform::identity(800.0, 600.0),
            debug: DebugOptions::default(),
            observers: Vec::new(),
            state: DiagramState::new(),
            config,
        }
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The most recent layout result, including any cycle participants.
    pub fn last_layout(&self) -> Option<&LayoutOutcome> {
        self.last_layout.as_ref()
    }

    pub fn renderer(&self) -> Option<&dyn Renderer> {
        self.renderer.as_deref()
    }

    pub fn debug_options(&self) -> DebugOptions {
        self.debug
    }

    pub fn set_debug_options(&mut self, debug: DebugOptions) {
        self.debug = debug;
    }

    /// Registers a callback run after every state change (e.g. to persist the diagram).
    pub fn subscribe(&mut self, observer: impl FnMut(&DiagramState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn dispatch(&mut self, action: Action) {
        self.dispatch_all(vec![action]);
    }

    /// Applies `actions` in order, lays out again if the graph's shape changed, then notifies
    /// observers once.
    pub fn dispatch_all(&mut self, actions: Vec<Action>) {
        if actions.is_empty() {
            return;
        }
        let before = self.state.clone();
        for action in actions {
            self.state = self.state.apply(action);
        }
        self.relayout_if_needed();
        if self.state != before {
            self.notify();
        }
    }

    /// Replaces the whole state, e.g. after loading a document.
    pub fn replace_state(&mut self, state: DiagramState) {
        self.controller.cancel();
        self.state = state;
        self.relayout_if_needed();
        self.notify();
    }

    /// Resizes the diagram area. A new size always triggers a layout and a full redraw.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = geom::viewport(width, height);
        let origin = self.transform.origin;
        self.transform = SurfaceTransform::identity(width, height).with_origin(origin.x, origin.y);
        if let Some(renderer) = self.renderer.as_mut() {
            if let RendererStatus::Placeholder { reason } = renderer.resize(width, height) {
                tracing::warn!(%reason, width, height, "renderer fell back to its placeholder");
            }
        }
        if self.relayout_if_needed() {
            self.notify();
        }
    }

    /// Lays out unconditionally.
    pub fn relayout(&mut self) {
        self.apply_layout();
        self.notify();
    }

    fn relayout_if_needed(&mut self) -> bool {
        if !self.trigger.should_relayout(&self.state, self.viewport) {
            return false;
        }
        self.apply_layout();
        true
    }

    fn apply_layout(&mut self) {
        let outcome = trellis_layout::layout(
            &self.state.tasks,
            &self.state.dependencies,
            self.viewport,
            &self.layout_options,
        );
        tracing::debug!(
            tasks = outcome.tasks.len(),
            cyclic = outcome.cyclic.len(),
            "diagram relaid out"
        );
        self.state = outcome.apply_to(&self.state);
        self.trigger.record(&self.state, self.viewport);
        self.last_layout = Some(outcome);
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer(&self.state);
        }
    }

    /// Swaps in a renderer of `kind` mounted in `container`, releasing the previous one.
    pub fn attach_renderer(
        &mut self,
        kind: RendererKind,
        container: &mut dyn Container,
    ) -> RendererStatus {
        self.detach_renderer();
        let mut renderer = create_renderer(kind, &self.config.render);
        renderer.set_client_origin(self.transform.origin);
        let status = renderer.initialize(container, self.viewport.width, self.viewport.height);
        if let RendererStatus::Placeholder { reason } = &status {
            tracing::warn!(renderer = %kind, %reason, "interaction disabled");
        }
        self.renderer = Some(renderer);
        status
    }

    pub fn detach_renderer(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.cleanup();
        }
        self.controller.cancel();
    }

    /// Where the drawing area sits in client coordinates.
    pub fn set_client_origin(&mut self, x: f64, y: f64) {
        self.transform = self.transform.with_origin(x, y);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_client_origin(self.transform.origin);
        }
    }

    pub fn render_props(&self) -> RenderProps {
        RenderProps::capture(&self.state, &self.controller, self.viewport, self.debug)
    }

    pub fn render(&mut self) -> RenderOutcome {
        let props = self.render_props();
        match self.renderer.as_mut() {
            Some(renderer) => renderer.render(&props),
            None => RenderOutcome::Unavailable,
        }
    }

    fn accepts_input(&self) -> bool {
        self.renderer.as_ref().is_none_or(|r| r.is_interactive())
    }

    fn to_diagram(&self, event: PointerEvent) -> DiagramPoint {
        event.diagram.unwrap_or_else(|| {
            if self.debug.use_adjusted_coordinates {
                self.transform.client_to_diagram(event.client)
            } else {
                self.transform.client_to_diagram_unadjusted(event.client)
            }
        })
    }

    pub fn pointer_down(&mut self, client: ClientPoint) {
        if !self.accepts_input() {
            return;
        }
        let mut event = PointerEvent::new(client);
        if let Some(renderer) = self.renderer.as_mut() {
            event = renderer.handle_pointer_down(event);
        }
        let p = self.to_diagram(event);
        let actions = self.controller.pointer_down(&self.state, p);
        self.dispatch_all(actions);
    }

    pub fn pointer_move(&mut self, client: ClientPoint) {
        if !self.accepts_input() {
            return;
        }
        let mut event = PointerEvent::new(client);
        if let Some(renderer) = self.renderer.as_mut() {
            event = renderer.handle_pointer_move(event);
        }
        let p = self.to_diagram(event);
        self.controller.pointer_move(&self.state, p);
    }

    pub fn pointer_up(&mut self, client: ClientPoint) {
        if !self.accepts_input() {
            return;
        }
        let mut event = PointerEvent::new(client);
        if let Some(renderer) = self.renderer.as_mut() {
            event = renderer.handle_pointer_up(event);
        }
        let p = self.to_diagram(event);
        let actions = self.controller.pointer_up(&self.state, p);
        self.dispatch_all(actions);
    }

    /// The pointer left the drawing area; any drag is abandoned.
    pub fn pointer_leave(&mut self) {
        self.controller.cancel();
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> trellis_core::Result<()> {
        persist::save(store, &self.state)
    }

    /// Loads the saved diagram if the model is still empty. Returns whether anything was loaded.
    pub fn restore(&mut self, store: &dyn KeyValueStore) -> bool {
        match persist::restore_into(store, &self.state) {
            Some(state) => {
                self.replace_state(state);
                true
            }
            None => false,
        }
    }
}

impl Drop for Diagram {
    fn drop(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.cleanup();
        }
    }
}
