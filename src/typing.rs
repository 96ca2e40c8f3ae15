use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TYPING_DELAY_MS: u64 = 100;
const DEFAULT_DELETING_DELAY_MS: u64 = 50;
const DEFAULT_PAUSE_AFTER_TYPE_MS: u64 = 2_000;
const DEFAULT_PAUSE_BEFORE_NEXT_MS: u64 = 500;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnimatorError {
    #[error("phrase list is empty")]
    EmptyPhraseList,
    #[error("display surface `{0}` not found")]
    MissingSurface(String),
}

/// Anything that can show the animator's current text.
pub trait DisplaySurface {
    fn render(&mut self, text: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseList {
    phrases: Vec<String>,
}

impl PhraseList {
    pub fn new<I, S>(phrases: I) -> Result<Self, AnimatorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();

        if phrases.is_empty() {
            return Err(AnimatorError::EmptyPhraseList);
        }

        Ok(Self { phrases })
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    fn get(&self, index: usize) -> &str {
        &self.phrases[index % self.phrases.len()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypingTimings {
    pub typing: Duration,
    pub deleting: Duration,
    pub pause_after_type: Duration,
    pub pause_before_next: Duration,
}

impl Default for TypingTimings {
    fn default() -> Self {
        Self {
            typing: Duration::from_millis(DEFAULT_TYPING_DELAY_MS),
            deleting: Duration::from_millis(DEFAULT_DELETING_DELAY_MS),
            pause_after_type: Duration::from_millis(DEFAULT_PAUSE_AFTER_TYPE_MS),
            pause_before_next: Duration::from_millis(DEFAULT_PAUSE_BEFORE_NEXT_MS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypingMode {
    Typing,
    PausedAfterType,
    Deleting,
    PausedBeforeNext,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AnimatorState {
    pub phrase_index: usize,
    pub letter_index: usize,
    pub mode: TypingMode,
}

impl AnimatorState {
    fn initial() -> Self {
        Self {
            phrase_index: 0,
            letter_index: 0,
            mode: TypingMode::Typing,
        }
    }
}

/// Output of one step: what to show and how long to wait before the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub delay: Duration,
    pub state: AnimatorState,
}

/// Cycles through a phrase list, typing and deleting one character per step.
///
/// The pause modes are waited out by the delay of the step that entered
/// them. The step that ends a pause immediately performs the first action of
/// the following mode, so every step renders exactly one frame.
#[derive(Clone, Debug)]
pub struct TypingAnimator {
    phrases: PhraseList,
    timings: TypingTimings,
    state: AnimatorState,
}

impl TypingAnimator {
    pub fn new<I, S>(phrases: I, timings: TypingTimings) -> Result<Self, AnimatorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::with_phrase_list(PhraseList::new(phrases)?, timings))
    }

    pub fn with_phrase_list(phrases: PhraseList, timings: TypingTimings) -> Self {
        Self {
            phrases,
            timings,
            state: AnimatorState::initial(),
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    pub fn current_phrase(&self) -> &str {
        self.phrases.get(self.state.phrase_index)
    }

    /// Text currently on display.
    pub fn rendered(&self) -> &str {
        char_prefix(self.current_phrase(), self.state.letter_index)
    }

    pub fn step(&mut self) -> Frame {
        let delay = match self.state.mode {
            TypingMode::Typing => self.type_next(),
            TypingMode::PausedAfterType => {
                self.state.mode = TypingMode::Deleting;
                self.delete_last()
            }
            TypingMode::Deleting => self.delete_last(),
            TypingMode::PausedBeforeNext => {
                self.state.mode = TypingMode::Typing;
                self.type_next()
            }
        };

        Frame {
            text: self.rendered().to_string(),
            delay,
            state: self.state,
        }
    }

    /// Runs one step and writes its text to `surface`.
    pub fn advance_one_step<S: DisplaySurface + ?Sized>(&mut self, surface: &mut S) -> Duration {
        let frame = self.step();
        surface.render(&frame.text);
        frame.delay
    }

    fn type_next(&mut self) -> Duration {
        let phrase_len = self.current_phrase().chars().count();

        if self.state.letter_index < phrase_len {
            self.state.letter_index += 1;
        }

        if self.state.letter_index == phrase_len {
            self.state.mode = TypingMode::PausedAfterType;
            self.timings.pause_after_type
        } else {
            self.timings.typing
        }
    }

    fn delete_last(&mut self) -> Duration {
        self.state.letter_index = self.state.letter_index.saturating_sub(1);

        if self.state.letter_index == 0 {
            self.state.phrase_index = (self.state.phrase_index + 1) % self.phrases.len();
            self.state.mode = TypingMode::PausedBeforeNext;
            self.timings.pause_before_next
        } else {
            self.timings.deleting
        }
    }
}

fn char_prefix(value: &str, chars: usize) -> &str {
    match value.char_indices().nth(chars) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator(phrases: &[&str]) -> TypingAnimator {
        TypingAnimator::new(phrases.iter().copied(), TypingTimings::default())
            .expect("non-empty phrase list")
    }

    #[derive(Default)]
    struct VecSurface {
        frames: Vec<String>,
    }

    impl DisplaySurface for VecSurface {
        fn render(&mut self, text: &str) {
            self.frames.push(text.to_string());
        }
    }

    #[test]
    fn empty_phrase_list_fails_at_construction() {
        let result = TypingAnimator::new(Vec::<String>::new(), TypingTimings::default());
        assert_eq!(result.err(), Some(AnimatorError::EmptyPhraseList));
    }

    #[test]
    fn starts_typing_the_first_phrase_from_nothing() {
        let animator = animator(&["Go"]);

        assert_eq!(
            animator.state(),
            AnimatorState {
                phrase_index: 0,
                letter_index: 0,
                mode: TypingMode::Typing,
            }
        );
        assert_eq!(animator.rendered(), "");
    }

    #[test]
    fn typing_reveals_each_phrase_in_as_many_steps_as_it_has_chars() {
        let phrases = ["Software Engineer", "Web Developer", "Problem Solver"];
        let mut animator = animator(&phrases);

        for (index, phrase) in phrases.iter().enumerate() {
            assert_eq!(animator.state().phrase_index, index);

            let length = phrase.chars().count();
            for step in 1..=length {
                let frame = animator.step();
                assert_eq!(frame.text, phrase[..step]);
            }
            assert_eq!(animator.rendered(), *phrase);
            assert_eq!(animator.state().mode, TypingMode::PausedAfterType);

            while animator.state().mode != TypingMode::PausedBeforeNext {
                animator.step();
            }
        }
    }

    #[test]
    fn full_cycle_clears_text_and_advances_phrase_once() {
        let mut animator = animator(&["abc", "de"]);

        for _ in 0..3 {
            animator.step();
        }
        assert_eq!(animator.state().mode, TypingMode::PausedAfterType);

        let mut deleting_frames = Vec::new();
        loop {
            let frame = animator.step();
            deleting_frames.push(frame.text);
            if frame.state.mode == TypingMode::PausedBeforeNext {
                break;
            }
            assert_eq!(frame.state.phrase_index, 0);
        }

        assert_eq!(deleting_frames, vec!["ab", "a", ""]);
        assert_eq!(animator.state().letter_index, 0);
        assert_eq!(animator.state().phrase_index, 1);
        assert_eq!(animator.rendered(), "");
    }

    #[test]
    fn phrase_index_wraps_after_the_last_phrase() {
        let mut animator = animator(&["a", "b", "c"]);
        let mut seen = Vec::new();

        for _ in 0..6 {
            seen.push(animator.state().phrase_index);
            // type one char, delete it
            animator.step();
            animator.step();
        }

        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn single_phrase_list_repeats_the_same_phrase() {
        let mut animator = animator(&["Hi"]);
        let texts: Vec<String> = (0..8).map(|_| animator.step().text).collect();

        assert_eq!(texts, vec!["H", "Hi", "H", "", "H", "Hi", "H", ""]);
        assert_eq!(animator.state().phrase_index, 0);
    }

    #[test]
    fn go_rust_scenario_renders_expected_frames_and_delays() {
        let mut animator = animator(&["Go", "Rust"]);
        let frames: Vec<(String, u64, usize)> = (0..12)
            .map(|_| {
                let frame = animator.step();
                (frame.text, frame.delay.as_millis() as u64, frame.state.phrase_index)
            })
            .collect();

        let expected = vec![
            ("G", 100, 0),
            ("Go", 2_000, 0),
            ("G", 50, 0),
            ("", 500, 1),
            ("R", 100, 1),
            ("Ru", 100, 1),
            ("Rus", 100, 1),
            ("Rust", 2_000, 1),
            ("Rus", 50, 1),
            ("Ru", 50, 1),
            ("R", 50, 1),
            ("", 500, 0),
        ];
        let expected: Vec<(String, u64, usize)> = expected
            .into_iter()
            .map(|(text, delay, index)| (text.to_string(), delay, index))
            .collect();

        assert_eq!(frames, expected);
    }

    #[test]
    fn identical_construction_yields_identical_sequences() {
        let mut first = animator(&["Go", "Rust"]);
        let mut second = animator(&["Go", "Rust"]);

        for _ in 0..40 {
            assert_eq!(first.step(), second.step());
        }
    }

    #[test]
    fn letter_index_stays_within_phrase_bounds() {
        let mut animator = animator(&["ab", "", "xyz"]);

        for _ in 0..100 {
            let frame = animator.step();
            let phrase_len = animator.current_phrase().chars().count();
            assert!(frame.state.letter_index <= phrase_len);
        }
    }

    #[test]
    fn empty_phrase_pauses_then_moves_on() {
        let mut animator = animator(&["", "a"]);

        let first = animator.step();
        assert_eq!(first.text, "");
        assert_eq!(first.state.mode, TypingMode::PausedAfterType);
        assert_eq!(first.delay, TypingTimings::default().pause_after_type);

        let second = animator.step();
        assert_eq!(second.state.mode, TypingMode::PausedBeforeNext);
        assert_eq!(second.state.phrase_index, 1);
    }

    #[test]
    fn multibyte_phrases_are_sliced_on_char_boundaries() {
        let mut animator = animator(&["héllo→"]);
        let texts: Vec<String> = (0..6).map(|_| animator.step().text).collect();

        assert_eq!(texts, vec!["h", "hé", "hél", "héll", "héllo", "héllo→"]);
    }

    #[test]
    fn advance_one_step_writes_each_frame_to_the_surface() {
        let mut animator = animator(&["Go"]);
        let mut surface = VecSurface::default();

        let delays: Vec<Duration> = (0..4)
            .map(|_| animator.advance_one_step(&mut surface))
            .collect();

        assert_eq!(surface.frames, vec!["G", "Go", "G", ""]);
        assert_eq!(delays[1], Duration::from_millis(2_000));
        assert_eq!(delays[3], Duration::from_millis(500));
    }
}
