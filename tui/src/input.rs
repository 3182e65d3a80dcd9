//! Input handling for the pairdeck TUI.
//!
//! Crossterm events are translated into [`Command`]s by a pure mapping and
//! then applied to the [`App`] through its named triggers, so every key,
//! click and drag takes the same path as the equivalent button.

use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use pairdeck_engine::{App, ReasonInput, ReasonPicker, Region, Screen};
use pairdeck_types::ConfidenceFilter;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a backpressured send unblocks the input thread.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Bounded queue: apply backpressure instead of dropping events.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain up to a frame's worth of input. Returns `true` when the app should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` when the app should quit.
pub fn apply_event(app: &mut App, ev: Event) -> bool {
    match ev {
        Event::Key(key) if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            if let Some(command) = map_key(KeyContext::of(app), key) {
                apply_command(app, command);
            }
        }
        Event::Mouse(mouse) => apply_mouse(app, mouse),
        _ => {}
    }
    app.should_quit()
}

/// What the key mapping needs to know about the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyContext {
    pub screen: Screen,
    pub modal_open: bool,
    pub typing_other: bool,
}

impl KeyContext {
    #[must_use]
    pub fn of(app: &App) -> Self {
        let reason = app.machine().reason();
        Self {
            screen: app.machine().screen(),
            modal_open: reason.is_some(),
            typing_other: reason.is_some_and(ReasonPicker::is_other_selected),
        }
    }
}

/// Shell-level command, one per named trigger on [`App`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Reload,
    SelectFilter(ConfidenceFilter),
    CycleFilter,
    Start,
    Confirm,
    Reject,
    Skip,
    Undo,
    Back,
    ReviewSkipped,
    Escape,
    Reason(ReasonInput),
}

fn is_undo(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('z' | 'Z'))
        && !key.modifiers.contains(KeyModifiers::ALT)
}

#[must_use]
pub fn map_key(ctx: KeyContext, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    if ctx.modal_open {
        return map_reason_key(ctx.typing_other, key).map(Command::Reason);
    }

    if key.code == KeyCode::Esc {
        return Some(if ctx.screen == Screen::Summary {
            Command::Back
        } else {
            Command::Escape
        });
    }

    // Ctrl/Cmd+Z and bare z all undo.
    if is_undo(&key) && ctx.screen != Screen::Queue {
        return Some(Command::Undo);
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }

    match ctx.screen {
        Screen::Queue => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Start),
            KeyCode::Tab | KeyCode::Char('f') => Some(Command::CycleFilter),
            KeyCode::Char(c @ '1'..='3') => {
                let index = (c as usize) - ('1' as usize);
                Some(Command::SelectFilter(ConfidenceFilter::ALL[index]))
            }
            KeyCode::Char('r' | 'R') => Some(Command::Reload),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        },
        Screen::Review => match key.code {
            KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Command::Confirm),
            KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Command::Reject),
            KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Command::Skip),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        },
        Screen::Summary => match key.code {
            KeyCode::Char('r' | 'R') => Some(Command::ReviewSkipped),
            KeyCode::Char('b' | 'B') | KeyCode::Backspace => Some(Command::Back),
            KeyCode::Char('q') => Some(Command::Quit),
            _ => None,
        },
    }
}

fn map_reason_key(typing_other: bool, key: KeyEvent) -> Option<ReasonInput> {
    match key.code {
        KeyCode::Esc => Some(ReasonInput::Dismiss),
        KeyCode::Enter => Some(ReasonInput::Submit),
        KeyCode::Tab => Some(ReasonInput::SkipReason),
        KeyCode::Up => Some(ReasonInput::CursorUp),
        KeyCode::Down => Some(ReasonInput::CursorDown),
        KeyCode::Backspace if typing_other => Some(ReasonInput::Backspace),
        KeyCode::Char(c) if typing_other && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(ReasonInput::Type(c))
        }
        KeyCode::Char(' ') => Some(ReasonInput::ChooseCursor),
        KeyCode::Char('k') => Some(ReasonInput::CursorUp),
        KeyCode::Char('j') => Some(ReasonInput::CursorDown),
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as usize) - ('1' as usize);
            (index < ReasonPicker::OPTION_COUNT).then_some(ReasonInput::Choose(index))
        }
        _ => None,
    }
}

pub fn apply_command(app: &mut App, command: Command) {
    tracing::trace!(?command, "Applying command");
    match command {
        Command::Quit => app.request_quit(),
        Command::Reload => app.reload(),
        Command::SelectFilter(filter) => app.select_filter(filter),
        Command::CycleFilter => app.cycle_filter(),
        Command::Start => app.start_review(),
        Command::Confirm => app.confirm(),
        Command::Reject => app.reject(),
        Command::Skip => app.skip(),
        Command::Undo => app.undo(),
        Command::Back => app.back(),
        Command::ReviewSkipped => app.review_skipped(),
        Command::Escape => app.escape(),
        Command::Reason(input) => app.reason_input(input),
    }
}

/// Column to device-independent pixels.
fn column_to_px(app: &App, column: u16) -> f32 {
    f32::from(column) * app.settings().pixels_per_column
}

fn apply_mouse(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.machine().reason().is_some() {
                let hits = app.hit_map();
                let option = hits.reason_option_at(column, row);
                let on = |region: Option<Region>| region.is_some_and(|r| r.contains(column, row));
                let submit = on(hits.reason_submit);
                let skip = on(hits.reason_skip);
                let backdrop = hits.is_backdrop(column, row);
                if let Some(index) = option {
                    app.reason_input(ReasonInput::Choose(index));
                } else if submit {
                    app.reason_input(ReasonInput::Submit);
                } else if skip {
                    app.reason_input(ReasonInput::SkipReason);
                } else if backdrop {
                    app.reason_input(ReasonInput::Dismiss);
                }
                return;
            }
            if app
                .hit_map()
                .card
                .is_some_and(|card| card.contains(column, row))
            {
                let x = column_to_px(app, column);
                app.pointer_down(x);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let x = column_to_px(app, column);
            app.pointer_move(x);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let x = column_to_px(app, column);
            app.pointer_up(x);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctx(screen: Screen) -> KeyContext {
        KeyContext {
            screen,
            modal_open: false,
            typing_other: false,
        }
    }

    fn modal(typing_other: bool) -> KeyContext {
        KeyContext {
            screen: Screen::Review,
            modal_open: true,
            typing_other,
        }
    }

    #[test]
    fn review_keys_match_gestures() {
        let review = ctx(Screen::Review);
        assert_eq!(map_key(review, key(KeyCode::Right)), Some(Command::Confirm));
        assert_eq!(map_key(review, key(KeyCode::Char('d'))), Some(Command::Confirm));
        assert_eq!(map_key(review, key(KeyCode::Left)), Some(Command::Reject));
        assert_eq!(map_key(review, key(KeyCode::Char('A'))), Some(Command::Reject));
        assert_eq!(map_key(review, key(KeyCode::Down)), Some(Command::Skip));
        assert_eq!(map_key(review, key(KeyCode::Char('s'))), Some(Command::Skip));
    }

    #[test]
    fn undo_accepts_bare_ctrl_and_cmd() {
        let review = ctx(Screen::Review);
        assert_eq!(map_key(review, key(KeyCode::Char('z'))), Some(Command::Undo));
        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::SUPER, KeyModifiers::META] {
            assert_eq!(
                map_key(review, KeyEvent::new(KeyCode::Char('z'), modifiers)),
                Some(Command::Undo)
            );
        }
        assert_eq!(
            map_key(ctx(Screen::Summary), key(KeyCode::Char('z'))),
            Some(Command::Undo)
        );
        assert_eq!(map_key(ctx(Screen::Queue), key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn modal_gates_decision_keys() {
        let open = modal(false);
        assert_eq!(map_key(open, key(KeyCode::Right)), None);
        assert_eq!(map_key(open, key(KeyCode::Left)), None);
        assert_eq!(map_key(open, key(KeyCode::Char('z'))), None);
        assert_eq!(
            map_key(open, key(KeyCode::Esc)),
            Some(Command::Reason(ReasonInput::Dismiss))
        );
        assert_eq!(
            map_key(open, key(KeyCode::Char('2'))),
            Some(Command::Reason(ReasonInput::Choose(1)))
        );
        assert_eq!(map_key(open, key(KeyCode::Char('9'))), None);
        assert_eq!(
            map_key(open, key(KeyCode::Tab)),
            Some(Command::Reason(ReasonInput::SkipReason))
        );
        assert_eq!(
            map_key(open, key(KeyCode::Enter)),
            Some(Command::Reason(ReasonInput::Submit))
        );
    }

    #[test]
    fn other_text_captures_characters() {
        let typing = modal(true);
        assert_eq!(
            map_key(typing, key(KeyCode::Char('2'))),
            Some(Command::Reason(ReasonInput::Type('2')))
        );
        assert_eq!(
            map_key(typing, key(KeyCode::Char(' '))),
            Some(Command::Reason(ReasonInput::Type(' ')))
        );
        assert_eq!(
            map_key(typing, key(KeyCode::Backspace)),
            Some(Command::Reason(ReasonInput::Backspace))
        );
    }

    #[test]
    fn queue_and_summary_keys() {
        let queue = ctx(Screen::Queue);
        assert_eq!(map_key(queue, key(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(
            map_key(queue, key(KeyCode::Char('2'))),
            Some(Command::SelectFilter(ConfidenceFilter::High))
        );
        assert_eq!(map_key(queue, key(KeyCode::Char('f'))), Some(Command::CycleFilter));
        assert_eq!(map_key(queue, key(KeyCode::Char('R'))), Some(Command::Reload));

        let summary = ctx(Screen::Summary);
        assert_eq!(map_key(summary, key(KeyCode::Char('r'))), Some(Command::ReviewSkipped));
        assert_eq!(map_key(summary, key(KeyCode::Char('b'))), Some(Command::Back));
        assert_eq!(map_key(summary, key(KeyCode::Esc)), Some(Command::Back));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctx(Screen::Review), ctrl_c), Some(Command::Quit));
        assert_eq!(map_key(modal(true), ctrl_c), Some(Command::Quit));
    }
}
