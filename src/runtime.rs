use crate::config::AnimatorConfig;
use crate::logging::{log_event, LogLevel};
use crate::typing::{AnimatorError, AnimatorState, DisplaySurface, TypingAnimator, TypingMode};
use crossterm::{
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::{self, IsTerminal, Stdout, Write};
use tokio::{
    sync::oneshot,
    task::{JoinError, JoinHandle},
    time::sleep,
};

/// Rewrites a single terminal line on every frame.
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<Stdout> {
    pub fn stdout() -> Result<Self, AnimatorError> {
        let out = io::stdout();
        let is_terminal = out.is_terminal();
        Self::from_writer(out, "stdout", is_terminal)
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Refuses writers that are not attached to a terminal.
    pub fn from_writer(out: W, name: &str, is_terminal: bool) -> Result<Self, AnimatorError> {
        if !is_terminal {
            return Err(AnimatorError::MissingSurface(name.to_string()));
        }

        Ok(Self { out })
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.out
            .queue(MoveToColumn(0))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(Print(text))?;
        self.out.flush()
    }

    fn finish_line(&mut self) {
        let _ = writeln!(self.out);
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn render(&mut self, text: &str) {
        let _ = self.write_line(text);
    }
}

/// Owns the task driving a typing loop. Dropping the handle aborts the task.
pub struct TypingLoopHandle<S> {
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<(AnimatorState, S)>,
}

impl<S> TypingLoopHandle<S> {
    /// Cancels the pending step and hands back the final state and surface.
    pub async fn stop(mut self) -> Result<(AnimatorState, S), JoinError> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        (&mut self.task).await
    }
}

impl<S> Drop for TypingLoopHandle<S> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Steps `animator` immediately, then once per frame delay, until stopped.
pub fn spawn_typing_loop<S>(
    mut animator: TypingAnimator,
    mut surface: S,
    log_level: LogLevel,
) -> TypingLoopHandle<S>
where
    S: DisplaySurface + Send + 'static,
{
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        loop {
            let delay = animator.advance_one_step(&mut surface);
            let state = animator.state();

            if state.mode == TypingMode::PausedAfterType {
                log_event(
                    log_level,
                    LogLevel::Debug,
                    "typing_phrase_typed",
                    serde_json::json!({
                        "phrase_index": state.phrase_index,
                        "hold_ms": delay.as_millis(),
                    }),
                );
            }

            tokio::select! {
                _ = sleep(delay) => {}
                _ = &mut stop_rx => break,
            }
        }

        (animator.state(), surface)
    });

    TypingLoopHandle {
        stop_tx: Some(stop_tx),
        task,
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AnimatorConfig::from_env();
    let animator = TypingAnimator::new(config.phrases.clone(), config.timings)?;
    let surface = TerminalSurface::stdout()?;

    log_event(
        config.log_level,
        LogLevel::Info,
        "typing_loop_started",
        serde_json::json!({
            "phrases": animator.phrases().len(),
            "typing_delay_ms": config.timings.typing.as_millis(),
            "deleting_delay_ms": config.timings.deleting.as_millis(),
            "hold_ms": config.timings.pause_after_type.as_millis(),
            "next_phrase_delay_ms": config.timings.pause_before_next.as_millis(),
        }),
    );

    let handle = spawn_typing_loop(animator, surface, config.log_level);
    tokio::signal::ctrl_c().await?;
    let (state, mut surface) = handle.stop().await?;
    surface.finish_line();

    log_event(
        config.log_level,
        LogLevel::Info,
        "typing_loop_stopped",
        serde_json::json!({ "state": state }),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::TypingTimings;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct RecordingSurface {
        frames: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSurface {
        fn snapshot(&self) -> Vec<String> {
            self.frames.lock().expect("frames lock").clone()
        }
    }

    impl DisplaySurface for RecordingSurface {
        fn render(&mut self, text: &str) {
            self.frames.lock().expect("frames lock").push(text.to_string());
        }
    }

    fn go_rust() -> TypingAnimator {
        TypingAnimator::new(["Go", "Rust"], TypingTimings::default()).expect("non-empty phrase list")
    }

    #[tokio::test(start_paused = true)]
    async fn loop_renders_frames_on_schedule() {
        let surface = RecordingSurface::default();
        let handle = spawn_typing_loop(go_rust(), surface.clone(), LogLevel::Info);

        // G@0 Go@100 G@2100 ""@2150 R@2650
        sleep(Duration::from_millis(2_700)).await;
        assert_eq!(surface.snapshot(), vec!["G", "Go", "G", "", "R"]);

        // Ru@2750 Rus@2850 Rust@2950
        sleep(Duration::from_millis(300)).await;
        assert_eq!(
            surface.snapshot(),
            vec!["G", "Go", "G", "", "R", "Ru", "Rus", "Rust"]
        );

        let (state, _) = handle.stop().await.expect("loop task joins");
        assert_eq!(
            state,
            AnimatorState {
                phrase_index: 1,
                letter_index: 4,
                mode: TypingMode::PausedAfterType,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_loop_renders_nothing_more() {
        let surface = RecordingSurface::default();
        let handle = spawn_typing_loop(go_rust(), surface.clone(), LogLevel::Info);

        sleep(Duration::from_millis(150)).await;
        handle.stop().await.expect("loop task joins");
        let rendered = surface.snapshot().len();

        sleep(Duration::from_secs(10)).await;
        assert_eq!(surface.snapshot().len(), rendered);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_aborts_the_loop() {
        let surface = RecordingSurface::default();
        let handle = spawn_typing_loop(go_rust(), surface.clone(), LogLevel::Info);

        sleep(Duration::from_millis(150)).await;
        drop(handle);
        let rendered = surface.snapshot().len();

        sleep(Duration::from_secs(10)).await;
        assert_eq!(surface.snapshot().len(), rendered);
        assert_eq!(surface.snapshot(), vec!["G", "Go"]);
    }

    #[test]
    fn non_terminal_writer_is_a_missing_surface() {
        let result = TerminalSurface::from_writer(Vec::<u8>::new(), "stdout", false);
        assert_eq!(
            result.err(),
            Some(AnimatorError::MissingSurface("stdout".to_string()))
        );
    }

    #[test]
    fn terminal_surface_rewrites_the_line() {
        let mut surface =
            TerminalSurface::from_writer(Vec::new(), "test", true).expect("terminal writer accepted");

        surface.render("G");
        surface.render("Go");

        let written = String::from_utf8(surface.out).expect("utf-8 output");
        assert!(written.ends_with("Go"));
        assert_eq!(written.matches("Go").count(), 1);
    }
}
