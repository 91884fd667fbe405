// ABOUTME: Carousel controller: markup transform, rendering, navigation and autoplay
// ABOUTME: Owns the block document, its timers and its listeners; all behavior is event-driven

use crate::config::CarouselConfig;
use crate::dom::{Document, NodeId};
use crate::errors::{CarouselError, Result};
use crate::events::{Action, Event, EventTarget, EventType, Key, ListenerRegistry};
use crate::markup::Block;
use crate::scheduler::{Scheduler, TimerHandle};
use log::{debug, info, warn};

/// Class names assigned to the decorated structure, for external stylesheets.
pub mod classes {
    pub const WRAPPER: &str = "carousel-wrapper";
    pub const TRACK: &str = "carousel-slides";
    pub const SLIDE: &str = "carousel-slide";
    pub const NAV: &str = "carousel-nav";
    pub const NAV_PREV: &str = "carousel-nav-prev";
    pub const NAV_NEXT: &str = "carousel-nav-next";
    pub const DOTS: &str = "carousel-dots";
    pub const DOT: &str = "carousel-dot";
    pub const ACTIVE: &str = "active";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    AutoplayTick,
    ResizeSettled,
}

/// Horizontal coordinates of the gesture in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TouchState {
    pub start_x: f64,
    pub end_x: f64,
}

/// Handles to the elements built by [`Carousel::decorate`], indexed directly at render time.
#[derive(Debug, Clone)]
pub struct CarouselElements {
    pub block: NodeId,
    pub wrapper: NodeId,
    pub track: NodeId,
    pub slides: Vec<NodeId>,
    pub prev_button: NodeId,
    pub next_button: NodeId,
    pub dots_container: NodeId,
    pub dots: Vec<NodeId>,
}

pub struct Carousel {
    document: Document,
    elements: CarouselElements,
    config: CarouselConfig,
    current_slide: usize,
    autoplay: Option<TimerHandle>,
    resize_timer: Option<TimerHandle>,
    touch: TouchState,
    scheduler: Scheduler<Task>,
    listeners: ListenerRegistry,
    render_count: usize,
    destroyed: bool,
}

impl Carousel {
    /// Decorate a parsed block.
    pub fn from_block(block: Block, config: CarouselConfig) -> Result<Self> {
        Self::decorate(block.document, block.container, config)
    }

    /// Turn the first list under `block` into a carousel: restyle the list as the
    /// track, add prev/next buttons and a dot strip, wire listeners, render once
    /// without animation and start autoplay.
    ///
    /// Fails without touching the document when the block has no list or the
    /// list has no items.
    pub fn decorate(
        mut document: Document,
        block: NodeId,
        config: CarouselConfig,
    ) -> Result<Self> {
        config.validate()?;

        let track = document
            .query_selector_tag(block, "ul")
            .ok_or(CarouselError::MissingList)?;
        let slides = document.children_by_tag(track, "li");
        if slides.is_empty() {
            return Err(CarouselError::EmptyList);
        }

        info!("Decorating carousel with {} slides", slides.len());

        document.set_class_name(track, classes::TRACK);
        for slide in &slides {
            document.set_class_name(*slide, classes::SLIDE);
        }

        let wrapper = document.create_element("div");
        document.set_class_name(wrapper, classes::WRAPPER);
        document.append_child(wrapper, track);

        let prev_button = build_nav_button(&mut document, classes::NAV_PREV, "Previous slide", "<");
        let next_button = build_nav_button(&mut document, classes::NAV_NEXT, "Next slide", ">");
        document.append_child(wrapper, prev_button);
        document.append_child(wrapper, next_button);

        let dots_container = document.create_element("div");
        document.set_class_name(dots_container, classes::DOTS);
        let mut dots = Vec::with_capacity(slides.len());
        for index in 0..slides.len() {
            let dot = document.create_element("button");
            document.set_class_name(dot, classes::DOT);
            document.set_attribute(dot, "aria-label", &format!("Go to slide {}", index + 1));
            if index == 0 {
                document.add_class(dot, classes::ACTIVE);
            }
            document.append_child(dots_container, dot);
            dots.push(dot);
        }

        document.replace_children(block, &[wrapper, dots_container]);

        let elements = CarouselElements {
            block,
            wrapper,
            track,
            slides,
            prev_button,
            next_button,
            dots_container,
            dots,
        };

        let mut carousel = Self {
            document,
            elements,
            config,
            current_slide: 0,
            autoplay: None,
            resize_timer: None,
            touch: TouchState::default(),
            scheduler: Scheduler::new(),
            listeners: ListenerRegistry::new(),
            render_count: 0,
            destroyed: false,
        };

        carousel.register_listeners();

        let first = carousel.elements.slides[0];
        carousel.document.add_class(first, classes::ACTIVE);
        carousel.render(false);
        carousel.start_autoplay();

        Ok(carousel)
    }

    fn register_listeners(&mut self) {
        let elements = &self.elements;
        let listeners = &mut self.listeners;

        listeners.add(
            EventTarget::Node(elements.prev_button),
            EventType::Click,
            Action::PrevSlide,
        );
        listeners.add(
            EventTarget::Node(elements.next_button),
            EventType::Click,
            Action::NextSlide,
        );
        for (index, dot) in elements.dots.iter().enumerate() {
            listeners.add(
                EventTarget::Node(*dot),
                EventType::Click,
                Action::GoToSlide(index),
            );
        }

        let block = EventTarget::Node(elements.block);
        let track = EventTarget::Node(elements.track);
        listeners.add(block, EventType::KeyDown, Action::ArrowKeys);
        listeners.add(track, EventType::TouchStart, Action::RecordTouchStart);
        listeners.add(track, EventType::TouchEnd, Action::RecordTouchEnd);
        listeners.add(block, EventType::MouseEnter, Action::PauseAutoplay);
        listeners.add(block, EventType::MouseLeave, Action::ResumeAutoplay);
        listeners.add(
            EventTarget::Document,
            EventType::VisibilityChange,
            Action::VisibilityToggle,
        );
        listeners.add(EventTarget::Window, EventType::Resize, Action::DebouncedResize);

        debug!("Registered {} listeners", listeners.len());
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for host layout updates such as slide widths.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn elements(&self) -> &CarouselElements {
        &self.elements
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn slide_count(&self) -> usize {
        self.elements.slides.len()
    }

    pub fn touch(&self) -> TouchState {
        self.touch
    }

    pub fn autoplay_state(&self) -> AutoplayState {
        if self.autoplay.is_some() {
            AutoplayState::Running
        } else {
            AutoplayState::Stopped
        }
    }

    pub fn is_autoplay_running(&self) -> bool {
        self.autoplay_state() == AutoplayState::Running
    }

    /// Virtual time in milliseconds since decoration.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// How many times the track has been rendered, initial render included.
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn track_transform(&self) -> Option<&str> {
        self.document.style(self.elements.track, "transform")
    }

    pub fn track_transition(&self) -> Option<&str> {
        self.document.style(self.elements.track, "transition")
    }

    /// Serialized block markup.
    pub fn to_html(&self) -> String {
        self.document.to_html(self.elements.block)
    }

    /// Report the same rendered width for every slide, as a host layout pass would.
    pub fn set_slide_width(&mut self, width: f64) {
        for slide in &self.elements.slides {
            self.document.set_offset_width(*slide, width);
        }
    }

    fn slide_width(&self) -> f64 {
        match self.document.offset_width(self.elements.slides[0]) {
            Some(width) if width.is_finite() && width >= 0.0 => width,
            other => {
                warn!(
                    "Slide width unavailable ({:?}); rendering with zero offset",
                    other
                );
                0.0
            }
        }
    }

    /// Move the track to the current slide and sync the active flags.
    pub fn render(&mut self, animate: bool) {
        let offset = self.current_slide as f64 * self.slide_width();
        let track = self.elements.track;

        let transition = if animate {
            self.config.transition()
        } else {
            "none".to_string()
        };
        self.document.set_style(track, "transition", &transition);
        self.document
            .set_style(track, "transform", &format!("translateX(-{}px)", offset));

        for (index, dot) in self.elements.dots.iter().enumerate() {
            self.document
                .toggle_class(*dot, classes::ACTIVE, index == self.current_slide);
        }
        for (index, slide) in self.elements.slides.iter().enumerate() {
            self.document
                .toggle_class(*slide, classes::ACTIVE, index == self.current_slide);
        }

        self.render_count += 1;
    }

    /// Navigate to `index`. Out-of-range indices wrap a single step: anything
    /// negative lands on the last slide, anything past the end on the first.
    pub fn go_to_slide(&mut self, index: isize) {
        if self.destroyed {
            return;
        }

        let count = self.slide_count();
        self.current_slide = if index < 0 {
            count - 1
        } else if index as usize >= count {
            0
        } else {
            index as usize
        };
        debug!("Navigating to slide {}", self.current_slide);

        self.render(true);
        self.reset_autoplay();
    }

    pub fn prev_slide(&mut self) {
        self.go_to_slide(self.current_slide as isize - 1);
    }

    pub fn next_slide(&mut self) {
        self.go_to_slide(self.current_slide as isize + 1);
    }

    /// Arm the autoplay interval unless it is already running.
    pub fn start_autoplay(&mut self) {
        if self.destroyed || !self.config.autoplay || self.autoplay.is_some() {
            return;
        }
        let handle = self
            .scheduler
            .set_interval(self.config.autoplay_delay_ms, Task::AutoplayTick);
        self.autoplay = Some(handle);
    }

    pub fn stop_autoplay(&mut self) {
        if let Some(handle) = self.autoplay.take() {
            self.scheduler.clear(handle);
        }
    }

    pub fn reset_autoplay(&mut self) {
        self.stop_autoplay();
        self.start_autoplay();
    }

    fn autoplay_tick(&mut self) {
        self.current_slide = (self.current_slide + 1) % self.slide_count();
        debug!("Autoplay advanced to slide {}", self.current_slide);
        self.render(true);
    }

    fn schedule_resize(&mut self) {
        if let Some(handle) = self.resize_timer.take() {
            self.scheduler.clear(handle);
        }
        let handle = self
            .scheduler
            .set_timeout(self.config.resize_debounce_ms, Task::ResizeSettled);
        self.resize_timer = Some(handle);
    }

    fn handle_swipe(&mut self) {
        let diff = self.touch.start_x - self.touch.end_x;
        if diff.abs() > self.config.swipe_threshold {
            if diff > 0.0 {
                self.next_slide();
            } else {
                self.prev_slide();
            }
        }
    }

    /// Deliver an input event. Returns true when at least one listener handled it.
    pub fn dispatch(&mut self, target: EventTarget, event: Event) -> bool {
        if self.destroyed {
            return false;
        }

        let actions = self
            .listeners
            .resolve(&self.document, target, event.event_type());
        for action in &actions {
            self.run_action(*action, &event);
        }
        !actions.is_empty()
    }

    fn run_action(&mut self, action: Action, event: &Event) {
        match (action, event) {
            (Action::PrevSlide, _) => self.prev_slide(),
            (Action::NextSlide, _) => self.next_slide(),
            (Action::GoToSlide(index), _) => self.go_to_slide(index as isize),
            (Action::ArrowKeys, Event::KeyDown(Key::ArrowLeft)) => self.prev_slide(),
            (Action::ArrowKeys, Event::KeyDown(Key::ArrowRight)) => self.next_slide(),
            (Action::RecordTouchStart, Event::TouchStart { screen_x }) => {
                self.touch = TouchState {
                    start_x: *screen_x,
                    end_x: *screen_x,
                };
            }
            (Action::RecordTouchEnd, Event::TouchEnd { screen_x }) => {
                self.touch.end_x = *screen_x;
                self.handle_swipe();
            }
            (Action::PauseAutoplay, _) => self.stop_autoplay(),
            (Action::ResumeAutoplay, _) => self.start_autoplay(),
            (Action::VisibilityToggle, Event::VisibilityChange { hidden }) => {
                if *hidden {
                    self.stop_autoplay();
                } else {
                    self.start_autoplay();
                }
            }
            (Action::DebouncedResize, _) => self.schedule_resize(),
            _ => {}
        }
    }

    /// Advance the virtual clock by `ms`, running every timer that comes due on
    /// the way. Returns how many timer tasks ran.
    pub fn advance(&mut self, ms: u64) -> usize {
        let until = self.scheduler.now().saturating_add(ms);
        let mut fired = 0;

        while let Some((handle, task)) = self.scheduler.next_due(until) {
            fired += 1;
            match task {
                Task::AutoplayTick => self.autoplay_tick(),
                Task::ResizeSettled => {
                    if self.resize_timer == Some(handle) {
                        self.resize_timer = None;
                    }
                    debug!("Resize settled; re-rendering without animation");
                    self.render(false);
                }
            }
        }

        self.scheduler.advance_to(until);
        fired
    }

    /// Cancel every timer and detach every listener. The decorated markup stays
    /// in place. Calling it again does nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.stop_autoplay();
        self.resize_timer = None;
        self.scheduler.clear_all();
        self.listeners.clear();
        self.destroyed = true;
        info!("Carousel destroyed");
    }

    /// Give up the controller and keep the document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

fn build_nav_button(document: &mut Document, modifier: &str, label: &str, glyph: &str) -> NodeId {
    let button = document.create_element("button");
    document.set_class_name(button, &format!("{} {}", classes::NAV, modifier));
    document.set_attribute(button, "aria-label", label);
    let span = document.create_element("span");
    document.append_text(span, glyph);
    document.append_child(button, span);
    button
}
