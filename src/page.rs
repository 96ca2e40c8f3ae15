//! Decisions behind the page behaviors, kept free of DOM types so they can be
//! tested natively. The wasm frontend feeds them measurements and applies
//! the results.

pub const NAVBAR_SOLID_SCROLL_Y: f64 = 50.0;
pub const NAVBAR_SOLID_BACKGROUND: &str = "rgba(26, 26, 26, 0.98)";
pub const NAVBAR_DEFAULT_BACKGROUND: &str = "rgba(26, 26, 26, 0.95)";
pub const ACTIVE_LINK_PROBE_OFFSET: f64 = 100.0;
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;
pub const SCROLL_THROTTLE_MS: f64 = 16.0;

#[cfg(target_arch = "wasm32")]
pub const REVEAL_THRESHOLD: f64 = 0.1;
#[cfg(target_arch = "wasm32")]
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
#[cfg(target_arch = "wasm32")]
pub const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealStyle {
    pub opacity: &'static str,
    pub transform: &'static str,
}

#[cfg(target_arch = "wasm32")]
pub const REVEAL_HIDDEN: RevealStyle = RevealStyle {
    opacity: "0",
    transform: "translateY(20px)",
};
#[cfg(target_arch = "wasm32")]
pub const REVEAL_SHOWN: RevealStyle = RevealStyle {
    opacity: "1",
    transform: "translateY(0)",
};

pub fn navbar_background(scroll_y: f64) -> &'static str {
    if scroll_y > NAVBAR_SOLID_SCROLL_Y {
        NAVBAR_SOLID_BACKGROUND
    } else {
        NAVBAR_DEFAULT_BACKGROUND
    }
}

/// Where to scroll so a section starts just below the fixed navbar.
pub fn scroll_target_top(section_top: f64, navbar_height: f64) -> f64 {
    section_top - navbar_height
}

#[derive(Clone, Debug, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// The section under the probe line. When sections overlap the last match
/// wins; `None` means the current highlight should be left alone.
pub fn active_section(scroll_y: f64, sections: &[SectionBounds]) -> Option<&str> {
    let probe = scroll_y + ACTIVE_LINK_PROBE_OFFSET;

    sections
        .iter()
        .rev()
        .find(|section| probe >= section.top && probe < section.top + section.height)
        .map(|section| section.id.as_str())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }

    pub fn closed() -> Self {
        Self { open: false }
    }
}

pub fn closes_menu_on_resize(viewport_width: f64) -> bool {
    viewport_width > MOBILE_BREAKPOINT_PX
}

pub fn closes_menu_on_click(inside_toggle: bool, inside_menu: bool) -> bool {
    !inside_toggle && !inside_menu
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThrottleDecision {
    RunNow,
    /// Arm one trailing run after this many milliseconds.
    RunAfter(f64),
    /// A trailing run is already armed and will cover this event.
    Coalesce,
}

/// Leading-edge throttle with a single trailing run per window.
#[derive(Clone, Debug)]
pub struct Throttle {
    wait_ms: f64,
    last_run_ms: Option<f64>,
    trailing_armed: bool,
}

impl Throttle {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms,
            last_run_ms: None,
            trailing_armed: false,
        }
    }

    pub fn on_event(&mut self, now_ms: f64) -> ThrottleDecision {
        if self.trailing_armed {
            return ThrottleDecision::Coalesce;
        }

        match self.last_run_ms {
            Some(last) if now_ms - last < self.wait_ms => {
                self.trailing_armed = true;
                ThrottleDecision::RunAfter(self.wait_ms - (now_ms - last))
            }
            _ => {
                self.last_run_ms = Some(now_ms);
                ThrottleDecision::RunNow
            }
        }
    }

    /// Records that the armed trailing run has fired.
    pub fn on_trailing_run(&mut self, now_ms: f64) {
        self.trailing_armed = false;
        self.last_run_ms = Some(now_ms);
    }
}
