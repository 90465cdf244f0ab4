// src/cli/shell.rs
//
// Interactive list screen. One thread: stdin lines, completed requests and the
// search debounce deadline are multiplexed with `select!` and fed into `App`.
use crate::application::modal::{ClickTarget, Key, ModalEvent, Screen};
use crate::application::note_form::Field;
use crate::application::{perform, App, AppSettings, Effect, Event, NoteService, ViewModel};
use crate::ports::terminal::TerminalPresenter;
use anyhow::{Context, Result};
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

pub const HELP: &str = "\
List:    search <text> | page <n> | next | prev | refresh | new | delete <id>
Confirm: y | n
New:     title <text> | content <text> | tag <Todo|Work|Personal|Meeting|Shopping>
         submit | esc | backdrop
Always:  help | quit";

/// Which set of commands the current screen accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    List,
    Confirm,
    Modal,
}

impl InputMode {
    pub fn of(app: &App) -> Self {
        if app.is_modal_open() {
            Self::Modal
        } else if app.awaiting_confirmation().is_some() {
            Self::Confirm
        } else {
            Self::List
        }
    }
}

#[derive(Debug)]
pub enum ShellCommand {
    Event(Event),
    Help,
    Quit,
}

/// Translate one input line. `Err` carries a message for the user.
pub fn parse_command(line: &str, mode: InputMode) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "help" | "?" => return Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => return Ok(ShellCommand::Quit),
        _ => {}
    }

    let event = match mode {
        InputMode::Confirm => Event::ConfirmDelete(matches!(word, "y" | "yes")),
        InputMode::Modal => match word {
            "title" => Event::FormEdit(Field::Title, rest.to_string()),
            "content" => Event::FormEdit(Field::Content, rest.to_string()),
            "tag" => Event::FormEdit(Field::Tag, rest.to_string()),
            "submit" => Event::SubmitForm,
            "esc" => Event::Modal(ModalEvent::Key(Key::Escape)),
            "backdrop" => Event::Modal(ModalEvent::Click(ClickTarget::Backdrop)),
            _ => return Err(format!("Unknown command in form: {word}")),
        },
        InputMode::List => match word {
            "search" | "s" => Event::SearchInput(rest.to_string()),
            "page" => Event::GoToPage(parse_number(rest)?),
            "next" | "n" => Event::NextPage,
            "prev" | "p" => Event::PrevPage,
            "refresh" | "r" => Event::Refresh,
            "new" => Event::OpenModal,
            "delete" | "d" => Event::RequestDelete(parse_number(rest)?),
            "" => return Err("Type `help` for commands".to_string()),
            _ => return Err(format!("Unknown command: {word}")),
        },
    };
    Ok(ShellCommand::Event(event))
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Expected a number, got `{value}`"))
}

type Pending = FuturesUnordered<LocalBoxFuture<'static, Event>>;

fn dispatch<S>(service: &S, pending: &mut Pending, effects: Vec<Effect>)
where
    S: NoteService + 'static,
{
    for effect in effects {
        debug!(?effect, "Starting request");
        let service = service.clone();
        pending.push(async move { perform(&service, effect).await }.boxed_local());
    }
}

/// Run until `quit` or end of input.
#[instrument(level = "debug", skip_all)]
pub async fn run<S>(service: S, settings: AppSettings) -> Result<()>
where
    S: NoteService + 'static,
{
    let presenter = TerminalPresenter::new();
    let mut app = App::new(settings, Screen::new().shared());
    let mut pending = Pending::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_view: Option<ViewModel> = None;

    println!("{HELP}");
    dispatch(&service, &mut pending, app.start(Instant::now()));
    redraw(&presenter, &app, &mut last_view);

    loop {
        let deadline = app.next_deadline();
        let sleep = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now).into());

        let event = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                match parse_command(&line, InputMode::of(&app)) {
                    Ok(ShellCommand::Event(event)) => event,
                    Ok(ShellCommand::Help) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(ShellCommand::Quit) => break,
                    Err(message) => {
                        println!("{message}");
                        continue;
                    }
                }
            }
            Some(event) = pending.next(), if !pending.is_empty() => event,
            _ = sleep, if deadline.is_some() => Event::Tick,
        };

        let effects = app.handle(event, Instant::now());
        dispatch(&service, &mut pending, effects);
        for notification in app.take_notifications() {
            println!("{}", presenter.render_notification(&notification));
        }
        redraw(&presenter, &app, &mut last_view);
    }

    debug!(in_flight = pending.len(), "Leaving shell");
    Ok(())
}

/// Print the screen when it changed. With the modal open only the form is drawn.
fn redraw(presenter: &TerminalPresenter, app: &App, last_view: &mut Option<ViewModel>) {
    let view = app.view();
    if last_view.as_ref() == Some(&view) {
        return;
    }
    match &view.modal {
        Some(form) if view.scroll_locked => print!("{}", presenter.render_form(form)),
        _ => print!("{}", presenter.render(&view)),
    }
    *last_view = Some(view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn event(line: &str, mode: InputMode) -> Event {
        match parse_command(line, mode) {
            Ok(ShellCommand::Event(event)) => event,
            other => panic!("expected event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn given_search_with_spaces_when_parsed_then_text_kept() {
        let parsed = event("search  team meeting ", InputMode::List);
        assert!(matches!(parsed, Event::SearchInput(text) if text == "team meeting"));
    }

    #[test]
    fn given_bare_search_when_parsed_then_clears_search() {
        assert!(matches!(event("search", InputMode::List), Event::SearchInput(text) if text.is_empty()));
    }

    #[rstest]
    #[case("page 3", 3)]
    #[case("page 12", 12)]
    fn given_page_command_when_parsed_then_go_to_page(#[case] line: &str, #[case] expected: u32) {
        assert!(matches!(event(line, InputMode::List), Event::GoToPage(n) if n == expected));
    }

    #[test]
    fn given_non_numeric_delete_when_parsed_then_error() {
        assert!(parse_command("delete abc", InputMode::List).is_err());
    }

    #[rstest]
    #[case("y", true)]
    #[case("yes", true)]
    #[case("n", false)]
    #[case("whatever", false)]
    fn given_confirm_mode_when_answered_then_confirm_delete(#[case] line: &str, #[case] expected: bool) {
        assert!(matches!(event(line, InputMode::Confirm), Event::ConfirmDelete(b) if b == expected));
    }

    #[test]
    fn given_modal_mode_when_title_typed_then_form_edit() {
        let parsed = event("title Weekly sync", InputMode::Modal);
        assert!(matches!(parsed, Event::FormEdit(Field::Title, text) if text == "Weekly sync"));
    }

    #[test]
    fn given_modal_mode_when_list_command_typed_then_rejected() {
        assert!(parse_command("next", InputMode::Modal).is_err());
    }

    #[rstest]
    #[case(InputMode::List)]
    #[case(InputMode::Modal)]
    #[case(InputMode::Confirm)]
    fn given_any_mode_when_quit_then_quit(#[case] mode: InputMode) {
        assert!(matches!(parse_command("quit", mode), Ok(ShellCommand::Quit)));
    }

    #[test]
    fn given_app_states_when_mode_derived_then_matches() {
        let now = Instant::now();
        let mut app = App::new(AppSettings::default(), Screen::new().shared());
        assert_eq!(InputMode::of(&app), InputMode::List);

        app.handle(Event::RequestDelete(3), now);
        assert_eq!(InputMode::of(&app), InputMode::Confirm);

        app.handle(Event::ConfirmDelete(false), now);
        app.handle(Event::OpenModal, now);
        assert_eq!(InputMode::of(&app), InputMode::Modal);
    }
}
