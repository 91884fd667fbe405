// ABOUTME: Event model and listener registry for carousel instances
// ABOUTME: Maps dispatched input events on targets to carousel actions, with bubbling

use crate::dom::{Document, NodeId};
use std::fmt;
use std::str::FromStr;

/// Where an event is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Node(NodeId),
    Document,
    Window,
}

/// Keyboard keys the carousel distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl FromStr for Key {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::Other(name) => f.write_str(name),
        }
    }
}

/// An input event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click,
    KeyDown(Key),
    TouchStart { screen_x: f64 },
    TouchEnd { screen_x: f64 },
    MouseEnter,
    MouseLeave,
    VisibilityChange { hidden: bool },
    Resize,
}

/// Payload-free discriminant of [`Event`], used to match listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Click,
    KeyDown,
    TouchStart,
    TouchEnd,
    MouseEnter,
    MouseLeave,
    VisibilityChange,
    Resize,
}

impl Event {
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Click => EventType::Click,
            Event::KeyDown(_) => EventType::KeyDown,
            Event::TouchStart { .. } => EventType::TouchStart,
            Event::TouchEnd { .. } => EventType::TouchEnd,
            Event::MouseEnter => EventType::MouseEnter,
            Event::MouseLeave => EventType::MouseLeave,
            Event::VisibilityChange { .. } => EventType::VisibilityChange,
            Event::Resize => EventType::Resize,
        }
    }
}

impl EventType {
    /// mouseenter/mouseleave and the document/window events don't bubble.
    pub fn bubbles(self) -> bool {
        matches!(
            self,
            EventType::Click | EventType::KeyDown | EventType::TouchStart | EventType::TouchEnd
        )
    }
}

/// What a listener does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PrevSlide,
    NextSlide,
    GoToSlide(usize),
    ArrowKeys,
    RecordTouchStart,
    RecordTouchEnd,
    PauseAutoplay,
    ResumeAutoplay,
    VisibilityToggle,
    DebouncedResize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub target: EventTarget,
    pub event_type: EventType,
    pub action: Action,
}

#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: EventTarget, event_type: EventType, action: Action) {
        self.listeners.push(Listener {
            target,
            event_type,
            action,
        });
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Actions triggered by `event_type` at `target`, innermost target first.
    /// Bubbling events also match listeners on the target's ancestors.
    pub fn resolve(
        &self,
        document: &Document,
        target: EventTarget,
        event_type: EventType,
    ) -> Vec<Action> {
        let mut path = vec![target];
        if let EventTarget::Node(node) = target {
            if event_type.bubbles() {
                path.extend(document.ancestors(node).map(EventTarget::Node));
            }
        }

        path.iter()
            .flat_map(|step| {
                self.listeners
                    .iter()
                    .filter(move |l| l.target == *step && l.event_type == event_type)
                    .map(|l| l.action)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parsing() {
        assert_eq!("ArrowLeft".parse::<Key>().unwrap(), Key::ArrowLeft);
        assert_eq!("ArrowRight".parse::<Key>().unwrap(), Key::ArrowRight);
        assert_eq!(
            "Enter".parse::<Key>().unwrap(),
            Key::Other("Enter".to_string())
        );
    }

    #[test]
    fn test_click_bubbles_to_ancestors() {
        let mut doc = Document::new();
        let block = doc.create_element("div");
        let button = doc.create_element("button");
        let span = doc.create_element("span");
        doc.append_child(block, button);
        doc.append_child(button, span);

        let mut registry = ListenerRegistry::new();
        registry.add(EventTarget::Node(button), EventType::Click, Action::NextSlide);
        registry.add(EventTarget::Node(block), EventType::KeyDown, Action::ArrowKeys);

        assert_eq!(
            registry.resolve(&doc, EventTarget::Node(span), EventType::Click),
            vec![Action::NextSlide]
        );
        assert_eq!(
            registry.resolve(&doc, EventTarget::Node(span), EventType::KeyDown),
            vec![Action::ArrowKeys]
        );
    }

    #[test]
    fn test_mouseenter_does_not_bubble() {
        let mut doc = Document::new();
        let block = doc.create_element("div");
        let child = doc.create_element("div");
        doc.append_child(block, child);

        let mut registry = ListenerRegistry::new();
        registry.add(
            EventTarget::Node(block),
            EventType::MouseEnter,
            Action::PauseAutoplay,
        );

        assert!(registry
            .resolve(&doc, EventTarget::Node(child), EventType::MouseEnter)
            .is_empty());
        assert_eq!(
            registry.resolve(&doc, EventTarget::Node(block), EventType::MouseEnter),
            vec![Action::PauseAutoplay]
        );
    }
}
