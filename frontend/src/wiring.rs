//! Composes the page wiring: overlay provisioning, field decoration, the
//! connector repaint loop and progress sync.
//!
//! Every repaint source owns a relay and the install step spawns a single
//! loop that selects over all of them, so one trigger always means exactly
//! one refresh pass.

use futures::channel::mpsc::UnboundedReceiver;
use futures::{StreamExt, select};
use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use shared::{connector_between, ChainConfig, LayoutRect, Viewport, GROWING_FIELD_SELECTOR};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, ResizeObserver, Window};

use crate::dataflow::{relay, Relay};
use crate::debug_utils;
use crate::overlay::Overlay;
use crate::trigger::RedrawTrigger;
use crate::{decorate, progress};

/// Environment problems that prevent wiring from starting at all. Anything
/// softer, like missing fields or absent chips, is tolerated per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    NoWindow,
    NoDocument,
    NoBody,
    OverlayUnsupported,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            WireError::NoWindow => "no window available",
            WireError::NoDocument => "window has no document",
            WireError::NoBody => "document has no body to attach the overlay to",
            WireError::OverlayUnsupported => "document cannot create SVG elements",
        };
        f.write_str(message)
    }
}

impl std::error::Error for WireError {}

/// Everything the page wiring owns: the overlay handle, the inserted button
/// listeners, the trigger relays and the observer watching field growth.
/// Dropping it unhooks every listener; the repaint loop ends on its next
/// trigger once its weak handle no longer upgrades.
pub struct TimelineWiring {
    chain: ChainConfig,
    window: Window,
    document: Document,
    overlay: Overlay,
    pub viewport_resized_relay: Relay<()>,
    pub viewport_scrolled_relay: Relay<()>,
    pub field_layout_changed_relay: Relay<()>,
    pub field_edited_relay: Relay<()>,
    pub fonts_settled_relay: Relay<()>,
    pub startup_relay: Relay<()>,
    listeners: RefCell<Vec<EventListener>>,
    growth_observer: RefCell<Option<GrowthObserver>>,
}

impl TimelineWiring {
    /// Decorate the page, provision the overlay, run the first paint and
    /// hook up every repaint trigger.
    pub fn install(chain: ChainConfig) -> Result<Rc<Self>, WireError> {
        let window = web_sys::window().ok_or(WireError::NoWindow)?;
        let document = window.document().ok_or(WireError::NoDocument)?;
        let overlay = Overlay::ensure(&document)?;

        decorate::decorate_fields(&document, &chain);
        let button_listeners = decorate::install_continue_buttons(&document, &chain);

        let (viewport_resized_relay, viewport_resized) = relay();
        let (viewport_scrolled_relay, viewport_scrolled) = relay();
        let (field_layout_changed_relay, field_layout_changed) = relay();
        let (field_edited_relay, field_edited) = relay();
        let (fonts_settled_relay, fonts_settled) = relay();
        let (startup_relay, startup) = relay();

        let wiring = Rc::new(Self {
            chain,
            window,
            document,
            overlay,
            viewport_resized_relay,
            viewport_scrolled_relay,
            field_layout_changed_relay,
            field_edited_relay,
            fonts_settled_relay,
            startup_relay,
            listeners: RefCell::new(button_listeners),
            growth_observer: RefCell::new(None),
        });

        wiring.refresh();
        wiring.hook_triggers();
        wiring.spawn_repaint_loop(
            viewport_resized,
            viewport_scrolled,
            field_layout_changed,
            field_edited,
            fonts_settled,
            startup,
        );

        Ok(wiring)
    }

    /// One full pass: reproject every connector, then re-sync the chips.
    pub fn refresh(&self) {
        self.render_connectors();
        progress::sync_chips(&self.document, &self.chain);
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    fn repaint(&self, trigger: RedrawTrigger) {
        debug_utils::debug_throttled(&format!("repaint after {trigger}"));
        self.refresh();
    }

    fn render_connectors(&self) {
        let viewport = self.viewport();
        let scale = viewport.device_pixel_ratio;
        self.overlay
            .set_frame(self.inner_width() * scale, self.inner_height() * scale);
        self.overlay.clear();

        for pair in self.chain.pairs() {
            let (Some(from), Some(to)) = (
                self.document.get_element_by_id(&pair.from),
                self.document.get_element_by_id(&pair.to),
            ) else {
                continue;
            };
            let connector = connector_between(layout_rect(&from), layout_rect(&to), viewport);
            self.overlay.draw(&self.document, &connector);
        }
    }

    fn viewport(&self) -> Viewport {
        let ratio = self.window.device_pixel_ratio();
        Viewport {
            scroll_x: self.window.scroll_x().unwrap_or(0.0),
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            device_pixel_ratio: if ratio > 0.0 { ratio } else { 1.0 },
        }
    }

    fn inner_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }

    fn inner_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0)
    }

    fn hook_triggers(self: &Rc<Self>) {
        let mut listeners = self.listeners.borrow_mut();

        let resized = self.viewport_resized_relay.clone();
        listeners.push(EventListener::new(&self.window, "resize", move |_| {
            resized.send(());
        }));

        let scrolled = self.viewport_scrolled_relay.clone();
        listeners.push(EventListener::new(&self.window, "scroll", move |_| {
            scrolled.send(());
        }));

        let edited = self.field_edited_relay.clone();
        listeners.push(EventListener::new(&self.document, "input", move |event| {
            if is_textarea_event(event) {
                edited.send(());
            }
        }));
        drop(listeners);

        *self.growth_observer.borrow_mut() =
            GrowthObserver::watch(&self.document, self.field_layout_changed_relay.clone());

        let fonts_settled = self.fonts_settled_relay.clone();
        let document = self.document.clone();
        spawn_local(async move {
            if let Ok(ready) = document.fonts().ready() {
                let _ = JsFuture::from(ready).await;
                fonts_settled.send(());
            }
        });

        // A zero-delay pass picks up layout settling right after wiring.
        let startup = self.startup_relay.clone();
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            startup.send(());
        });
    }

    fn spawn_repaint_loop(
        self: &Rc<Self>,
        viewport_resized: UnboundedReceiver<()>,
        viewport_scrolled: UnboundedReceiver<()>,
        field_layout_changed: UnboundedReceiver<()>,
        field_edited: UnboundedReceiver<()>,
        fonts_settled: UnboundedReceiver<()>,
        startup: UnboundedReceiver<()>,
    ) {
        let wiring = Rc::downgrade(self);
        spawn_local(async move {
            let mut viewport_resized = viewport_resized.fuse();
            let mut viewport_scrolled = viewport_scrolled.fuse();
            let mut field_layout_changed = field_layout_changed.fuse();
            let mut field_edited = field_edited.fuse();
            let mut fonts_settled = fonts_settled.fuse();
            let mut startup = startup.fuse();

            loop {
                let trigger = select! {
                    event = viewport_resized.next() => match event {
                        Some(()) => RedrawTrigger::ViewportResized,
                        None => break, // Stream ended
                    },
                    event = viewport_scrolled.next() => match event {
                        Some(()) => RedrawTrigger::ViewportScrolled,
                        None => break,
                    },
                    event = field_layout_changed.next() => match event {
                        Some(()) => RedrawTrigger::FieldLayoutChanged,
                        None => break,
                    },
                    event = field_edited.next() => match event {
                        Some(()) => RedrawTrigger::FieldEdited,
                        None => break,
                    },
                    event = fonts_settled.next() => match event {
                        Some(()) => RedrawTrigger::FontsSettled,
                        None => break,
                    },
                    event = startup.next() => match event {
                        Some(()) => RedrawTrigger::Startup,
                        None => break,
                    },
                };
                match wiring.upgrade() {
                    Some(wiring) => wiring.repaint(trigger),
                    None => break,
                }
            }
        });
    }
}

fn is_textarea_event(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .is_some_and(|element| element.matches("textarea").unwrap_or(false))
}

fn layout_rect(element: &Element) -> LayoutRect {
    let rect = element.get_bounding_client_rect();
    LayoutRect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

/// Owns the resize observer watching self-growing textareas, plus the
/// callback it borrows.
struct GrowthObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut()>,
}

impl GrowthObserver {
    /// Observe every `textarea.auto` present right now. Returns nothing when
    /// the page has none or the host lacks `ResizeObserver`.
    fn watch(document: &Document, layout_changed: Relay<()>) -> Option<Self> {
        let fields = document.query_selector_all(GROWING_FIELD_SELECTOR).ok()?;
        if fields.length() == 0 {
            return None;
        }

        let callback = Closure::<dyn FnMut()>::new(move || {
            layout_changed.send(());
        });
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref()).ok()?;
        for index in 0..fields.length() {
            if let Some(field) = fields
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            {
                observer.observe(&field);
            }
        }
        Some(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for GrowthObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
