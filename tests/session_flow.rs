//! End-to-end console sessions driven through the public API

use cellshell::commands::{tokenize, CommandRegistry, ERROR_PREFIX};
use cellshell::console::{
    Browse, ConsoleKey, ConsoleSession, Headless, Identity, IncomingMessage, RenderSurface, Tag,
};
use cellshell::CommandError;

const PROMPT: &str = "user@local:/ $ ";

fn submit(session: &mut ConsoleSession, surface: &mut Headless, line: &str) -> String {
    session.type_str(line, surface);
    session.submit(surface).output
}

/// Surface with a fixed drag selection, collapsed by caret placement
struct Dragged(Option<(usize, usize)>);

impl RenderSurface for Dragged {
    fn selection(&self) -> Option<(usize, usize)> {
        self.0
    }

    fn place_caret(&mut self, _index: usize) {
        self.0 = None;
    }
}

#[test]
fn echo_hi_end_to_end() {
    let mut session = ConsoleSession::new(Identity::default());
    let mut surface = Headless::default();
    assert_eq!(session.buffer().text(), PROMPT);

    let output = submit(&mut session, &mut surface, "echo hi");
    assert_eq!(output, "hi");
    assert_eq!(
        session.buffer().text(),
        format!("{}echo hi\nhi\n{}", PROMPT, PROMPT)
    );
    assert_eq!(session.last_result(), "hi");
    assert_eq!(session.buffer().input_boundary(), session.buffer().len());
    assert_eq!(session.buffer().prompt_start(), session.buffer().len() - PROMPT.len());
}

#[test]
fn boundary_strictly_increases_per_submission() {
    let mut session = ConsoleSession::default();
    let mut surface = Headless::default();
    let mut boundary = session.buffer().input_boundary();

    for line in ["", "   ", "echo a", "nope", "calc 1/0", "help", "wc"] {
        submit(&mut session, &mut surface, line);
        let next = session.buffer().input_boundary();
        assert!(next > boundary, "boundary did not move after {:?}", line);
        boundary = next;
    }
}

#[test]
fn history_cells_survive_editing() {
    let mut session = ConsoleSession::default();
    let mut surface = Headless::default();
    submit(&mut session, &mut surface, "echo keep me");
    let boundary = session.buffer().input_boundary();
    let history = session.buffer().cells()[..boundary].to_vec();

    session.type_str("xy", &mut surface);
    for _ in 0..5 {
        session.handle_key(ConsoleKey::Backspace, &mut surface);
    }
    session.move_cursor(0, &mut surface);
    session.handle_key(ConsoleKey::Delete, &mut surface);

    let mut drag = Dragged(Some((0, session.buffer().len())));
    session.handle_key(ConsoleKey::ToggleBold, &mut drag);
    session.handle_key(ConsoleKey::Delete, &mut drag);

    assert_eq!(&session.buffer().cells()[..boundary], &history[..]);
    assert!(session.buffer().cells().iter().all(|c| !c.has(Tag::Bold)));
}

#[test]
fn range_edits_inside_input() {
    let mut session = ConsoleSession::default();
    let mut surface = Headless::default();
    session.type_str("echo hello", &mut surface);
    let base = session.buffer().input_boundary();

    let mut drag = Dragged(Some((base + 5, base + 9)));
    session.handle_key(ConsoleKey::ToggleBold, &mut drag);
    assert!(session.buffer().cells()[base + 7].has(Tag::Bold));

    session.handle_key(ConsoleKey::Backspace, &mut drag);
    assert_eq!(session.input(), "echo ");
    assert_eq!(session.cursor(), base + 5);
}

#[test]
fn failing_handler_is_isolated() {
    let mut registry = CommandRegistry::new();
    cellshell::commands::register_builtins(&mut registry);
    registry.register("boom", "Always fails", "boom", |_, _| {
        Err(CommandError::Failed("it blew up".to_string()))
    });
    let mut session = ConsoleSession::with_registry(Identity::default(), registry);
    let mut surface = Headless::default();

    let output = submit(&mut session, &mut surface, "boom");
    assert!(output.starts_with(ERROR_PREFIX));
    assert_eq!(session.last_result(), output);
    assert!(session.buffer().text().ends_with(&format!("{}\n{}", output, PROMPT)));

    assert_eq!(submit(&mut session, &mut surface, "upper still fine"), "STILL FINE");
    assert_eq!(session.history().len(), 2);
}

#[test]
fn history_edges() {
    let mut session = ConsoleSession::default();
    let mut surface = Headless::default();

    session.handle_key(ConsoleKey::HistoryOlder, &mut surface);
    session.handle_key(ConsoleKey::HistoryNewer, &mut surface);
    assert_eq!(session.input(), "");
    assert_eq!(session.history().position(), Browse::Live);

    submit(&mut session, &mut surface, "   ");
    assert!(session.history().is_empty());

    submit(&mut session, &mut surface, "echo first");
    submit(&mut session, &mut surface, "echo second");

    session.type_str("draft", &mut surface);
    session.handle_key(ConsoleKey::HistoryNewer, &mut surface);
    assert_eq!(session.input(), "draft");

    for _ in 0..4 {
        session.handle_key(ConsoleKey::HistoryOlder, &mut surface);
        assert!(session.input() == "echo first" || session.input() == "echo second");
    }
    assert_eq!(session.input(), "echo first");
    assert_eq!(session.history().entries(), ["echo first", "echo second"]);

    let output = session.handle_key(ConsoleKey::Enter, &mut surface).map(|s| s.output);
    assert_eq!(output.as_deref(), Some("first"));
    assert_eq!(session.history().len(), 3);
}

#[test]
fn incoming_message_keeps_input_line() {
    let identity = Identity::new("ada lovelace", "engine room", "/home/ada");
    let prompt = identity.prompt();
    let mut session = ConsoleSession::new(identity);
    let mut surface = Headless::default();

    session.type_str("echo ", &mut surface);
    let before = session.cursor();
    session.receive_message(&IncomingMessage::new("ping", "grace hopper", "/tmp"), &mut surface);

    let sender = "grace@engine:/tmp $ ";
    assert_eq!(session.buffer().text(), format!("{}ping\n{}echo ", sender, prompt));
    assert_eq!(session.cursor(), before + sender.len() + "ping\n".len());

    assert_eq!(submit(&mut session, &mut surface, "pong"), "pong");
}

#[test]
fn clear_then_last() {
    let mut session = ConsoleSession::default();
    let mut surface = Headless::default();
    submit(&mut session, &mut surface, "echo remembered");
    assert_eq!(submit(&mut session, &mut surface, "last"), "remembered");

    submit(&mut session, &mut surface, "clear");
    assert_eq!(session.buffer().text(), PROMPT);
    assert_eq!(submit(&mut session, &mut surface, "last"), "No previous result");
}

#[test]
fn tokenizer_examples() {
    assert_eq!(tokenize("echo hello world"), ["echo", "hello", "world"]);
    assert_eq!(tokenize(r#"echo "a b" c"#), ["echo", "a b", "c"]);
    assert_eq!(tokenize(r"echo a\ b"), ["echo", "a b"]);
}

#[test]
fn sessions_are_independent() {
    let mut one = ConsoleSession::default();
    let mut two = ConsoleSession::default();
    let mut surface = Headless::default();

    submit(&mut one, &mut surface, "echo only here");
    assert_eq!(one.last_result(), "only here");
    assert_eq!(two.last_result(), "");
    assert!(two.history().is_empty());
    assert_eq!(submit(&mut two, &mut surface, "last"), "No previous result");
}
