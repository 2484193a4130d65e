pub mod config;
pub mod display;
pub mod input;
pub mod model;
pub mod net;
pub mod state;
pub mod surface;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{error, info, warn};

use config::Config;
use display::{GridRenderer, Scene};
use input::{Swipe, SwipeTracker};
use model::{ButtonsById, Layout};
use net::{ClientMessage, ConnectionPhase, NetEvent, ServerMessage};
use state::{Orientation, PanelState};
use surface::PanelSurface;

/// Everything the embedding shell can feed into the panel, funneled through
/// one entry point so tap routing needs no per-tile callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Viewport dimensions changed (resize or orientation flip).
    Viewport { width: u32, height: u32 },
    TouchStart { contacts: usize, x: f64 },
    TouchMove { contacts: usize, x: f64 },
    TouchEnd,
    /// A tile resolving to this button id was tapped.
    Tap { button_id: String },
    /// A pagination dot was tapped.
    DotTap { index: usize },
    /// The icon for this button failed to load asynchronously.
    IconFailed { button_id: String },
}

/// What the shell must do after feeding an event in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum InputReaction {
    None,
    /// Restart the resize quiescence window.
    DebounceResize,
    /// The gesture became a horizontal swipe: suppress native vertical
    /// scrolling until the touch ends.
    SuppressScroll,
}

/// The orchestrator: owns all mutable panel state and wires the connection,
/// the renderer, pagination, and gestures together. Everything is touched
/// from a single event-processing context, so a render pass always sees a
/// button map and layout swapped in together.
pub struct App<S: PanelSurface> {
    state: PanelState,
    layout: Option<Layout>,
    buttons: ButtonsById,
    scene: Scene,
    renderer: GridRenderer,
    swipe: SwipeTracker,
    surface: S,
    presses: mpsc::UnboundedSender<ClientMessage>,
    resize_debounce: Duration,
}

impl<S: PanelSurface> App<S> {
    pub fn new(config: &Config, surface: S, presses: mpsc::UnboundedSender<ClientMessage>) -> Self {
        Self {
            state: PanelState::new(),
            layout: None,
            buttons: ButtonsById::new(),
            scene: Scene::Empty,
            renderer: GridRenderer::new(config.panel.portrait_columns),
            swipe: SwipeTracker::new(config.gestures.swipe_threshold_px),
            surface,
            presses,
            resize_debounce: Duration::from_millis(config.panel.resize_debounce_ms),
        }
    }

    /// Drive the panel until the connection task ends. Resize events are
    /// debounced here: each new viewport event replaces the pending deadline,
    /// and the re-layout fires only after the quiescence window passes.
    pub async fn run(
        &mut self,
        net_events: &mut mpsc::UnboundedReceiver<NetEvent>,
        inputs: &mut mpsc::UnboundedReceiver<PanelEvent>,
    ) {
        let mut resize_deadline: Option<Instant> = None;
        let mut inputs_open = true;
        loop {
            let deadline = resize_deadline;
            let debounce = async move {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };
            tokio::select! {
                event = net_events.recv() => match event {
                    Some(event) => self.handle_net_event(event),
                    None => {
                        info!("connection task ended");
                        return;
                    }
                },
                event = inputs.recv(), if inputs_open => match event {
                    Some(event) => {
                        if self.handle_input(event) == InputReaction::DebounceResize {
                            resize_deadline = Some(Instant::now() + self.resize_debounce);
                        }
                    }
                    None => inputs_open = false,
                },
                _ = debounce => {
                    resize_deadline = None;
                    self.apply_viewport();
                }
            }
        }
    }

    pub fn handle_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::Phase(phase) => {
                self.state.phase = phase;
                self.surface.connection_status(phase);
            }
            NetEvent::Message(ServerMessage::InitialState { buttons, layout }) => {
                info!(
                    "initial state: {} button(s), {} page(s)",
                    buttons.len(),
                    layout.page_count
                );
                // Both replaced before any render pass can observe either.
                self.buttons = model::buttons_by_id(buttons);
                self.layout = Some(layout);
                self.relayout(true);
            }
            NetEvent::Message(ServerMessage::LayoutUpdate { layout }) => {
                info!("layout update: {} page(s)", layout.page_count);
                self.layout = Some(layout);
                self.relayout(true);
            }
        }
    }

    pub fn handle_input(&mut self, event: PanelEvent) -> InputReaction {
        match event {
            PanelEvent::Viewport { width, height } => {
                self.state.viewport = (width, height);
                return InputReaction::DebounceResize;
            }
            PanelEvent::TouchStart { contacts, x } => {
                if self.state.pages.is_active() {
                    self.swipe.touch_start(contacts, x);
                }
            }
            PanelEvent::TouchMove { contacts, x } => {
                if self.state.pages.is_active() && self.swipe.touch_move(contacts, x) {
                    return InputReaction::SuppressScroll;
                }
            }
            PanelEvent::TouchEnd => {
                if !self.state.pages.is_active() {
                    self.swipe.reset();
                } else if let Some(swipe) = self.swipe.touch_end() {
                    let current = self.state.current_page() as isize;
                    let target = match swipe {
                        Swipe::NextPage => current + 1,
                        Swipe::PreviousPage => current - 1,
                    };
                    self.change_page(target);
                }
            }
            PanelEvent::Tap { button_id } => self.report_press(&button_id),
            PanelEvent::DotTap { index } => self.change_page(index as isize),
            PanelEvent::IconFailed { button_id } => {
                if let Some(tile) = self.scene.degrade_icon(&button_id) {
                    warn!("icon failed to load for '{button_id}', tile degraded to text");
                    self.surface.update_tile(&button_id, &tile);
                }
            }
        }
        InputReaction::None
    }

    /// The resize quiescence window passed: recompute orientation and
    /// re-render from the layout already in hand. No network round-trip.
    pub fn apply_viewport(&mut self) {
        let (width, height) = self.state.viewport;
        self.state.orientation = Orientation::from_viewport(width, height);
        self.relayout(false);
    }

    fn relayout(&mut self, new_data: bool) {
        self.scene = self
            .renderer
            .render(self.layout.as_ref(), &self.buttons, self.state.orientation);
        self.state.pages = self.state.pages.reconcile(
            self.state.orientation,
            self.scene.page_count(),
            new_data,
        );
        self.surface.present(&self.scene, &self.state);
    }

    fn change_page(&mut self, target: isize) {
        if let Some(index) = self.state.pages.go_to_page(target) {
            self.surface.show_page(index);
        }
    }

    /// Fire-and-forget press report; refused (loudly) while not connected.
    fn report_press(&mut self, button_id: &str) {
        if self.state.phase != ConnectionPhase::Connected {
            error!("cannot report press for '{button_id}': not connected");
            return;
        }
        let message = ClientMessage::ButtonPress {
            button_id: button_id.to_string(),
        };
        if self.presses.send(message).is_err() {
            warn!("connection task is gone, press dropped");
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn buttons(&self) -> &ButtonsById {
        &self.buttons
    }
}
