use lc_core::ObservedStatus;

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum InputCommand {
    /// Forward to the remote process
    Send(String),
    /// `:status <value>`
    Status(ObservedStatus),
    /// `:snapshot`
    Snapshot,
    /// `:connect`
    Connect,
    /// `:close`
    Close,
    /// `:quit` or `:q`
    Quit,
    /// `:help`
    Help,
    /// A `:` directive that is not recognized
    Unknown(String),
    Empty,
}

pub const HELP: &str = "\
commands:
  <text>            send <text> to the server
  :status <value>   report a status change (e.g. running, stopped)
  :snapshot         print connection state, metrics and buffer size
  :connect          connect now and re-enable reconnects
  :close            disconnect and stop reconnecting
  :quit             exit";

/// Interpret one input line. A leading `::` escapes a literal colon.
pub fn parse_line(line: &str) -> InputCommand {
    let line = line.trim_end_matches(['\r', '\n']);

    if line.trim().is_empty() {
        return InputCommand::Empty;
    }

    if let Some(escaped) = line.strip_prefix("::") {
        return InputCommand::Send(format!(":{}", escaped));
    }

    let Some(directive) = line.strip_prefix(':') else {
        return InputCommand::Send(line.to_string());
    };

    let mut parts = directive.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "status" if !arg.is_empty() => InputCommand::Status(ObservedStatus::parse(arg)),
        "snapshot" => InputCommand::Snapshot,
        "connect" => InputCommand::Connect,
        "close" => InputCommand::Close,
        "quit" | "q" => InputCommand::Quit,
        "help" => InputCommand::Help,
        _ => InputCommand::Unknown(line.to_string()),
    }
}
