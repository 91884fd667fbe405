// ABOUTME: Scripted interaction for driving a carousel without a browser
// ABOUTME: Parses step lists like "next,dot:1,wait:5000" and records a snapshot after each step

use crate::carousel::Carousel;
use crate::errors::{CarouselError, Result};
use crate::events::{Event, EventTarget, Key};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// One host interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Next,
    Prev,
    Dot(usize),
    GoTo(isize),
    Key(Key),
    /// Horizontal travel, touch start minus touch end; positive is a leftward swipe.
    Swipe(f64),
    Hover,
    Leave,
    Hide,
    Show,
    Resize(f64),
    Wait(u64),
    Destroy,
}

impl FromStr for Step {
    type Err = CarouselError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s, None),
        };

        let invalid = || CarouselError::InvalidStep(s.to_string());
        let required = || arg.ok_or_else(invalid);

        Ok(match name {
            "next" => Step::Next,
            "prev" => Step::Prev,
            "dot" => Step::Dot(required()?.parse().map_err(|_| invalid())?),
            "goto" => Step::GoTo(required()?.parse().map_err(|_| invalid())?),
            "key" => Step::Key(required()?.parse().map_err(|_| invalid())?),
            "swipe" => Step::Swipe(parse_finite(required()?).ok_or_else(invalid)?),
            "hover" => Step::Hover,
            "leave" => Step::Leave,
            "hide" => Step::Hide,
            "show" => Step::Show,
            "resize" => Step::Resize(parse_finite(required()?).ok_or_else(invalid)?),
            "wait" => Step::Wait(required()?.parse().map_err(|_| invalid())?),
            "destroy" => Step::Destroy,
            _ => return Err(invalid()),
        })
    }
}

fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Next => write!(f, "next"),
            Step::Prev => write!(f, "prev"),
            Step::Dot(index) => write!(f, "dot:{}", index),
            Step::GoTo(index) => write!(f, "goto:{}", index),
            Step::Key(key) => write!(f, "key:{}", key),
            Step::Swipe(dx) => write!(f, "swipe:{}", dx),
            Step::Hover => write!(f, "hover"),
            Step::Leave => write!(f, "leave"),
            Step::Hide => write!(f, "hide"),
            Step::Show => write!(f, "show"),
            Step::Resize(width) => write!(f, "resize:{}", width),
            Step::Wait(ms) => write!(f, "wait:{}", ms),
            Step::Destroy => write!(f, "destroy"),
        }
    }
}

/// Parse a comma-separated step list; empty entries are skipped
pub fn parse_steps(script: &str) -> Result<Vec<Step>> {
    script
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<Step>())
        .collect()
}

/// Carousel state observed after a step.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub step: String,
    pub time_ms: u64,
    pub current_slide: usize,
    pub transform: String,
    pub transition: String,
    pub autoplay_running: bool,
}

impl Snapshot {
    pub fn capture(step: &str, carousel: &Carousel) -> Self {
        Self {
            step: step.to_string(),
            time_ms: carousel.now(),
            current_slide: carousel.current_slide(),
            transform: carousel.track_transform().unwrap_or_default().to_string(),
            transition: carousel.track_transition().unwrap_or_default().to_string(),
            autoplay_running: carousel.is_autoplay_running(),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>7}ms] {:<14} slide={} transform={} transition={} autoplay={}",
            self.time_ms,
            self.step,
            self.current_slide,
            self.transform,
            self.transition,
            if self.autoplay_running { "on" } else { "off" }
        )
    }
}

/// Apply one step the way a browser host would deliver it
pub fn apply_step(carousel: &mut Carousel, step: &Step) {
    let elements = carousel.elements().clone();
    let block = EventTarget::Node(elements.block);
    let track = EventTarget::Node(elements.track);

    match step {
        Step::Next => {
            carousel.dispatch(EventTarget::Node(elements.next_button), Event::Click);
        }
        Step::Prev => {
            carousel.dispatch(EventTarget::Node(elements.prev_button), Event::Click);
        }
        Step::Dot(index) => match elements.dots.get(*index) {
            Some(dot) => {
                carousel.dispatch(EventTarget::Node(*dot), Event::Click);
            }
            None => debug!("No dot at index {}; step ignored", index),
        },
        Step::GoTo(index) => carousel.go_to_slide(*index),
        Step::Key(key) => {
            carousel.dispatch(block, Event::KeyDown(key.clone()));
        }
        Step::Swipe(dx) => {
            let start = 1000.0;
            carousel.dispatch(track, Event::TouchStart { screen_x: start });
            carousel.dispatch(track, Event::TouchEnd { screen_x: start - dx });
        }
        Step::Hover => {
            carousel.dispatch(block, Event::MouseEnter);
        }
        Step::Leave => {
            carousel.dispatch(block, Event::MouseLeave);
        }
        Step::Hide => {
            carousel.dispatch(EventTarget::Document, Event::VisibilityChange { hidden: true });
        }
        Step::Show => {
            carousel.dispatch(EventTarget::Document, Event::VisibilityChange { hidden: false });
        }
        Step::Resize(width) => {
            carousel.set_slide_width(*width);
            carousel.dispatch(EventTarget::Window, Event::Resize);
        }
        Step::Wait(ms) => {
            carousel.advance(*ms);
        }
        Step::Destroy => carousel.destroy(),
    }
}

/// Run every step in order, recording the state after each
pub fn run_script(carousel: &mut Carousel, steps: &[Step]) -> Vec<Snapshot> {
    steps
        .iter()
        .map(|step| {
            apply_step(carousel, step);
            Snapshot::capture(&step.to_string(), carousel)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let steps = parse_steps("next, prev,dot:2,goto:-1,key:ArrowLeft,swipe:60,wait:5000,,resize:800").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Next,
                Step::Prev,
                Step::Dot(2),
                Step::GoTo(-1),
                Step::Key(Key::ArrowLeft),
                Step::Swipe(60.0),
                Step::Wait(5000),
                Step::Resize(800.0),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed_steps() {
        assert!(matches!(
            "jump".parse::<Step>(),
            Err(CarouselError::InvalidStep(_))
        ));
        assert!("dot".parse::<Step>().is_err());
        assert!("dot:x".parse::<Step>().is_err());
        assert!("swipe:NaN".parse::<Step>().is_err());
    }

    #[test]
    fn test_step_display_matches_syntax() {
        for text in ["next", "dot:1", "goto:-2", "swipe:60", "wait:250", "key:Enter"] {
            assert_eq!(text.parse::<Step>().unwrap().to_string(), text);
        }
    }
}
