use crate::command::Command;

/// Parse CLI arguments into a typed Command enum.
///
/// Arguments are expected WITHOUT the program name (i.e., `args` should
/// be `["status"]`, not `["adk", "status"]`).
pub fn parse_args(args: &[&str]) -> Result<Command, String> {
    if args.is_empty() {
        return Err("No command specified. Run 'adk help' for usage.".into());
    }

    match args[0] {
        "status" => parse_status(args),
        "sessions" => Ok(Command::Sessions),
        "watch" => Ok(Command::Watch),
        "monitor" => Ok(Command::Monitor),
        "approve" => parse_approve(args),
        "approve-all" => Ok(Command::ApproveAll),
        "help" => parse_help(args),
        _ => Err(format!("Unknown command: '{}'", args[0])),
    }
}

// ---------------------------------------------------------------------------
// Sub-parsers
// ---------------------------------------------------------------------------

/// `adk status [--json]`
fn parse_status(args: &[&str]) -> Result<Command, String> {
    let mut format = None;
    for arg in &args[1..] {
        match *arg {
            "--json" => format = Some("json".to_string()),
            other => return Err(format!("Unknown flag for status: '{}'", other)),
        }
    }
    Ok(Command::Status { format })
}

/// `adk approve <session:window> [<option>] [--text <input>]`
///
/// `<option>` is the one-based option number shown in the prompt menu.
fn parse_approve(args: &[&str]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("Usage: adk approve <session:window> [<option>] [--text <input>]".into());
    }
    let target = args[1].to_string();
    let mut option = None;
    let mut text = None;

    let rest = &args[2..];
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "--text" => {
                i += 1;
                text = Some(take_arg(rest, i, "--text")?);
            }
            value if option.is_none() && text.is_none() => {
                option = Some(
                    value
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n >= 1)
                        .ok_or_else(|| {
                            format!("Option must be a number starting at 1, got '{}'", value)
                        })?,
                );
            }
            other => return Err(format!("Unknown argument for approve: '{}'", other)),
        }
        i += 1;
    }
    if option.is_some() && text.is_some() {
        return Err("Pass either an option number or --text, not both".into());
    }
    Ok(Command::Approve {
        target,
        option,
        text,
    })
}

/// `adk help [topic]`
fn parse_help(args: &[&str]) -> Result<Command, String> {
    let topic = if args.len() > 1 {
        Some(args[1..].join(" "))
    } else {
        None
    };
    Ok(Command::Help { topic })
}

fn take_arg(rest: &[&str], i: usize, flag: &str) -> Result<String, String> {
    rest.get(i)
        .map(|s| s.to_string())
        .ok_or_else(|| format!("Missing value for {}", flag))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_error() {
        assert!(parse_args(&[]).is_err());
    }

    #[test]
    fn unknown_command_error() {
        let err = parse_args(&["frobnicate"]).unwrap_err();
        assert!(err.contains("frobnicate"));
    }

    #[test]
    fn status_plain_and_json() {
        assert_eq!(
            parse_args(&["status"]).unwrap(),
            Command::Status { format: None }
        );
        assert_eq!(
            parse_args(&["status", "--json"]).unwrap(),
            Command::Status {
                format: Some("json".into())
            }
        );
    }

    #[test]
    fn status_rejects_unknown_flag() {
        assert!(parse_args(&["status", "--verbose"]).is_err());
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_args(&["sessions"]).unwrap(), Command::Sessions);
        assert_eq!(parse_args(&["watch"]).unwrap(), Command::Watch);
        assert_eq!(parse_args(&["monitor"]).unwrap(), Command::Monitor);
        assert_eq!(parse_args(&["approve-all"]).unwrap(), Command::ApproveAll);
    }

    #[test]
    fn approve_requires_target() {
        assert!(parse_args(&["approve"]).is_err());
    }

    #[test]
    fn approve_default() {
        assert_eq!(
            parse_args(&["approve", "work:1"]).unwrap(),
            Command::Approve {
                target: "work:1".into(),
                option: None,
                text: None,
            }
        );
    }

    #[test]
    fn approve_with_option_number() {
        assert_eq!(
            parse_args(&["approve", "work:1", "2"]).unwrap(),
            Command::Approve {
                target: "work:1".into(),
                option: Some(2),
                text: None,
            }
        );
    }

    #[test]
    fn approve_rejects_zero_option() {
        assert!(parse_args(&["approve", "work:1", "0"]).is_err());
    }

    #[test]
    fn approve_with_text() {
        assert_eq!(
            parse_args(&["approve", "work:1", "--text", "yes please"]).unwrap(),
            Command::Approve {
                target: "work:1".into(),
                option: None,
                text: Some("yes please".into()),
            }
        );
    }

    #[test]
    fn approve_rejects_option_and_text() {
        assert!(parse_args(&["approve", "work:1", "2", "--text", "y"]).is_err());
    }

    #[test]
    fn approve_text_missing_value() {
        assert!(parse_args(&["approve", "work:1", "--text"]).is_err());
    }

    #[test]
    fn help_with_and_without_topic() {
        assert_eq!(parse_args(&["help"]).unwrap(), Command::Help { topic: None });
        assert_eq!(
            parse_args(&["help", "approve"]).unwrap(),
            Command::Help {
                topic: Some("approve".into())
            }
        );
    }
}
