use crate::config::AnimatorConfig;
use crate::logging::{log_event, LogLevel};
use crate::typing::{AnimatorError, DisplaySurface, TypingAnimator, TypingMode};
use std::{cell::RefCell, rc::Rc, time::Duration};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Element};

/// Writes frames into an element's text content.
pub struct ElementSurface {
    element: Element,
}

impl ElementSurface {
    pub fn find(element_id: &str) -> Result<Self, AnimatorError> {
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(element_id))
            .map(|element| Self { element })
            .ok_or_else(|| AnimatorError::MissingSurface(element_id.to_string()))
    }
}

impl DisplaySurface for ElementSurface {
    fn render(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}

struct LoopState {
    animator: TypingAnimator,
    surface: ElementSurface,
    pending_timeout: Option<i32>,
    log_level: LogLevel,
}

type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A typing loop armed on browser timeouts, one pending at a time.
///
/// The timeout callback keeps itself alive through `tick`; `stop` (or drop)
/// clears the pending timeout and releases the callback.
pub struct WebTypingLoop {
    state: Rc<RefCell<LoopState>>,
    tick: TickSlot,
}

impl WebTypingLoop {
    pub fn start(config: &AnimatorConfig, surface_id: &str) -> Result<Self, AnimatorError> {
        let animator = TypingAnimator::new(config.phrases.clone(), config.timings)?;
        let surface = ElementSurface::find(surface_id)?;

        let state = Rc::new(RefCell::new(LoopState {
            animator,
            surface,
            pending_timeout: None,
            log_level: config.log_level,
        }));
        let tick: TickSlot = Rc::new(RefCell::new(None));

        let callback = {
            let state = state.clone();
            let tick = tick.clone();
            Closure::<dyn FnMut()>::new(move || run_step(&state, &tick))
        };
        *tick.borrow_mut() = Some(callback);

        log_event(
            config.log_level,
            LogLevel::Info,
            "typing_loop_started",
            serde_json::json!({
                "surface": surface_id,
                "phrases": config.phrases.len(),
            }),
        );

        run_step(&state, &tick);
        Ok(Self { state, tick })
    }

    /// Same as dropping the loop.
    pub fn stop(self) {}
}

impl Drop for WebTypingLoop {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();

        if let (Some(handle), Some(win)) = (state.pending_timeout.take(), window()) {
            win.clear_timeout_with_handle(handle);
        }

        self.tick.borrow_mut().take();

        log_event(
            state.log_level,
            LogLevel::Info,
            "typing_loop_stopped",
            serde_json::json!({ "state": state.animator.state() }),
        );
    }
}

fn run_step(state: &Rc<RefCell<LoopState>>, tick: &TickSlot) {
    let (delay, log_level, typed) = {
        let mut guard = state.borrow_mut();
        let LoopState {
            animator,
            surface,
            pending_timeout,
            log_level,
        } = &mut *guard;

        *pending_timeout = None;
        let delay = animator.advance_one_step(surface);
        let typed = (animator.state().mode == TypingMode::PausedAfterType)
            .then(|| animator.state().phrase_index);
        (delay, *log_level, typed)
    };

    if let Some(phrase_index) = typed {
        log_event(
            log_level,
            LogLevel::Debug,
            "typing_phrase_typed",
            serde_json::json!({ "phrase_index": phrase_index }),
        );
    }

    arm(state, tick, delay);
}

fn arm(state: &Rc<RefCell<LoopState>>, tick: &TickSlot, delay: Duration) {
    let Some(win) = window() else {
        return;
    };
    let tick = tick.borrow();
    let Some(callback) = tick.as_ref() else {
        return;
    };

    let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
    if let Ok(handle) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        millis,
    ) {
        state.borrow_mut().pending_timeout = Some(handle);
    }
}
