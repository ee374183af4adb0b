use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::clipboard::Clipboard;
use crate::engine::Rewriter;
use crate::events::{Event, EventBus};
use crate::session::{Session, Status};

use super::ui::wrapped_line_count;

/// Rows moved per PageUp/PageDown.
const SCROLL_STEP: u16 = 5;

/// UI-side state wrapped around the [`Session`] controller: wiring from key
/// presses to session actions, the background dispatch, and view-only bits
/// like spinner phase and output scroll.
pub struct App<C: Clipboard> {
    pub session: Session,
    rewriter: Arc<dyn Rewriter>,
    bus: Arc<EventBus>,
    events: broadcast::Receiver<Event>,
    clipboard: C,
    pub spinner_tick: usize,
    pub output_scroll: u16,
    /// Inner size of the output panel as of the last frame.
    output_view: (u16, u16),
    /// Transient notice for problems outside the rewrite flow (clipboard).
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl<C: Clipboard> App<C> {
    pub fn new(rewriter: Arc<dyn Rewriter>, clipboard: C) -> Self {
        let bus = Arc::new(EventBus::default());
        let events = bus.subscribe();
        Self {
            session: Session::new(),
            rewriter,
            bus,
            events,
            clipboard,
            spinner_tick: 0,
            output_scroll: 0,
            output_view: (0, 0),
            notice: None,
            should_quit: false,
        }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Record the output panel's inner size and pull the scroll back in range.
    pub fn set_output_view(&mut self, width: u16, height: u16) {
        self.output_view = (width, height);
        self.output_scroll = self.output_scroll.min(self.max_output_scroll());
    }

    /// Furthest the output can scroll before its last line leaves the bottom.
    fn max_output_scroll(&self) -> u16 {
        let Some(text) = self.session.rewritten_text() else {
            return 0;
        };
        let (width, height) = self.output_view;
        let lines = wrapped_line_count(text, width).saturating_sub(height as usize);
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.trigger_rewrite(),
            KeyCode::Char('y') if ctrl => self.copy(now),
            KeyCode::Char('l') if ctrl => {
                self.session.clear_input();
            }
            KeyCode::Char(c) if !ctrl => {
                self.session.insert_char(c);
            }
            KeyCode::Enter => {
                self.session.insert_char('\n');
            }
            KeyCode::Tab => {
                self.session.insert_char('\t');
            }
            KeyCode::Backspace => {
                self.session.backspace();
            }
            KeyCode::PageDown => {
                self.output_scroll = self
                    .output_scroll
                    .saturating_add(SCROLL_STEP)
                    .min(self.max_output_scroll());
            }
            KeyCode::PageUp => self.output_scroll = self.output_scroll.saturating_sub(SCROLL_STEP),
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        // Terminals send \r line endings inside bracketed paste.
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if !self.session.insert_str(&text) && self.session.can_edit() {
            self.notice = Some(format!(
                "Paste ignored: input is limited to {} characters",
                self.session.max_len()
            ));
        }
    }

    /// Start a rewrite in the background if the session allows one. The
    /// outcome comes back through the event bus.
    pub fn trigger_rewrite(&mut self) {
        let Some(request) = self.session.begin_rewrite() else {
            return;
        };
        self.output_scroll = 0;
        self.notice = None;

        let rewriter = Arc::clone(&self.rewriter);
        let bus = Arc::clone(&self.bus);
        tokio::spawn(async move {
            let outcome = rewriter.rewrite(&request.original_text).await;
            bus.emit(Event::RewriteFinished { outcome });
        });
    }

    fn copy(&mut self, now: Instant) {
        if let Err(e) = self.session.copy(&mut self.clipboard, now) {
            tracing::warn!(error = %e, "clipboard write failed");
            self.notice = Some(e.to_string());
        }
    }

    /// Apply any finished background work.
    pub fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(Event::RewriteFinished { outcome }) => self.session.finish_rewrite(outcome),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event receiver lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    /// Called once per frame.
    pub fn tick(&mut self, now: Instant) {
        self.drain_events();
        self.session.tick(now);
        if self.session.status() == &Status::Loading {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::consts::COPIED_FEEDBACK;
    use crate::engine::REWRITE_FAILED_MESSAGE;
    use crate::engine::rewrite::RewriteEngine;
    use crate::generator::mock::{MockGenerator, MockReply};
    use std::time::Duration;

    fn app_with(replies: Vec<MockReply>) -> (App<MemoryClipboard>, Arc<MockGenerator>) {
        let generator = Arc::new(MockGenerator::new(replies));
        let engine = Arc::new(RewriteEngine::new(generator.clone()));
        (App::new(engine, MemoryClipboard::new()), generator)
    }

    fn press(app: &mut App<MemoryClipboard>, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_key(KeyEvent::new(code, modifiers), Instant::now());
    }

    fn type_text(app: &mut App<MemoryClipboard>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    async fn settle(app: &mut App<MemoryClipboard>) {
        for _ in 0..200 {
            app.tick(Instant::now());
            if !app.session.is_loading() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("rewrite never finished");
    }

    #[tokio::test]
    async fn typing_then_rewrite_succeeds() {
        let (mut app, generator) = app_with(vec![MockReply::Text("  Hey there, welcome!\n".into())]);
        type_text(&mut app, "Hello world");
        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(app.session.is_loading());

        settle(&mut app).await;

        assert_eq!(app.session.rewritten_text(), Some("Hey there, welcome!"));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn failure_shows_generic_message() {
        let (mut app, _) = app_with(vec![MockReply::Fail("dns error".into())]);
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        settle(&mut app).await;
        assert_eq!(app.session.error_message(), Some(REWRITE_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn rewrite_with_blank_input_does_nothing() {
        let (mut app, generator) = app_with(vec![]);
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        app.tick(Instant::now());
        assert_eq!(app.session.status(), &Status::Idle);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn repeated_trigger_while_loading_sends_one_request() {
        let (mut app, generator) = app_with(vec![
            MockReply::Text("one".into()),
            MockReply::Text("two".into()),
        ]);
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        settle(&mut app).await;
        assert_eq!(generator.calls(), 1);
        assert_eq!(app.session.rewritten_text(), Some("one"));
    }

    #[tokio::test]
    async fn copy_after_success() {
        let (mut app, _) = app_with(vec![MockReply::Text("copy me".into())]);
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        settle(&mut app).await;

        let now = Instant::now();
        app.handle_key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::CONTROL), now);
        assert_eq!(app.clipboard().contents(), Some("copy me"));
        assert!(app.session.copied());

        app.tick(now + COPIED_FEEDBACK);
        assert!(!app.session.copied());
    }

    #[test]
    fn copy_before_success_is_noop() {
        let (mut app, _) = app_with(vec![]);
        press(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(app.clipboard().writes(), 0);
        assert!(!app.session.copied());
    }

    #[test]
    fn editing_keys() {
        let (mut app, _) = app_with(vec![]);
        type_text(&mut app, "ab");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        type_text(&mut app, "c");
        assert_eq!(app.session.input(), "ab\nc");
        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.session.input(), "ab\n");
        press(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(app.session.input(), "");
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let (mut app, _) = app_with(vec![]);
        app.handle_paste("one\r\ntwo\rthree");
        assert_eq!(app.session.input(), "one\ntwo\nthree");
        assert!(app.notice.is_none());
    }

    #[test]
    fn oversized_paste_sets_notice() {
        let (mut app, _) = app_with(vec![]);
        let big = "x".repeat(app.session.max_len() + 1);
        app.handle_paste(&big);
        assert_eq!(app.session.input(), "");
        assert!(app.notice.is_some());
    }

    #[test]
    fn quit_keys() {
        let (mut app, _) = app_with(vec![]);
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit);

        let (mut app, _) = app_with(vec![]);
        press(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    fn app_showing(text: &str) -> App<MemoryClipboard> {
        let (mut app, _) = app_with(vec![]);
        app.session.set_input("Hello");
        app.session.begin_rewrite();
        app.session.finish_rewrite(Ok(text.to_string()));
        app
    }

    #[test]
    fn output_scroll_stays_put_without_output() {
        let (mut app, _) = app_with(vec![]);
        app.set_output_view(40, 10);
        press(&mut app, KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 0);
        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 0);
    }

    #[test]
    fn output_scroll_stops_at_last_line() {
        let text = (1..=12).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let mut app = app_showing(&text);
        app.set_output_view(40, 4);

        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 5);
        for _ in 0..10 {
            press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        }
        // 12 lines in a 4-row view.
        assert_eq!(app.output_scroll, 8);

        press(&mut app, KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 3);
    }

    #[test]
    fn output_scroll_counts_wrapped_rows() {
        // 30 chars in a 10-wide view wrap to 3 rows.
        let mut app = app_showing(&"x".repeat(30));
        app.set_output_view(10, 1);
        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 2);
    }

    #[test]
    fn taller_view_pulls_scroll_back() {
        let text = (1..=12).map(|n| format!("line {n}")).collect::<Vec<_>>().join("\n");
        let mut app = app_showing(&text);
        app.set_output_view(40, 4);
        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        press(&mut app, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(app.output_scroll, 8);

        app.set_output_view(40, 10);
        assert_eq!(app.output_scroll, 2);
    }
}
