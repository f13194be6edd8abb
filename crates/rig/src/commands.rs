//! Commands read from STDIN, one per line. They're the rig's stand-in for a pointer and keyboard.

use color_eyre::eyre::Result;
use tokio::io::AsyncBufReadExt as _;

use gushing_rig::input::{InputEvent, Key};
use gushing_rig::motion::SystemMotionPreference;

/// Everything that can be typed into the rig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Pointer or keyboard input on the rig
    Input(InputEvent),
    /// A change in the system's reduced motion preference. `None` means unknown.
    Motion(Option<bool>),
    /// Exit
    Quit,
}

impl Command {
    /// Parse a single line. Blank lines are `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((name, arguments)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name.to_lowercase().as_str(), arguments) {
            ("click", []) => Self::Input(InputEvent::Click),
            ("hover", []) => Self::Input(InputEvent::Hover),
            ("key", [key]) => Self::Input(InputEvent::Key(Key::from_name(key))),
            ("motion", [preference]) => Self::Motion(Self::parse_motion(preference)?),
            ("quit" | "exit", []) => Self::Quit,
            _ => color_eyre::eyre::bail!("Unknown command: '{}'", line.trim()),
        };

        Ok(Some(command))
    }

    /// Parse the argument to `motion`, in any case.
    fn parse_motion(preference: &str) -> Result<Option<bool>> {
        if preference.eq_ignore_ascii_case("unknown") {
            return Ok(None);
        }
        let Some(reduced) = SystemMotionPreference::parse(preference) else {
            color_eyre::eyre::bail!(
                "Unknown motion preference '{preference}', try `reduce`, `no-preference` or `unknown`"
            );
        };
        Ok(Some(reduced))
    }
}

/// Read commands from STDIN until `quit` or the end of input.
#[expect(
    clippy::print_stderr,
    reason = "Bad commands are reported straight back to the user, STDOUT is for renders"
)]
pub(crate) async fn listen(
    controller: &gushing_rig::controller::ControllerHandle,
    system_motion: &SystemMotionPreference,
    mut protocol_rx: tokio::sync::broadcast::Receiver<crate::run::Protocol>,
) -> Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        #[expect(
            clippy::integer_division_remainder_used,
            reason = "This is caused by the `tokio::select!`"
        )]
        let maybe_line = tokio::select! {
            line = lines.next_line() => line?,
            Ok(message) = protocol_rx.recv() => {
                if matches!(message, crate::run::Protocol::End) {
                    break;
                }
                continue;
            }
        };

        let Some(line) = maybe_line else {
            tracing::debug!("End of STDIN");
            break;
        };

        match Command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => apply(command, controller, system_motion).await,
            Ok(None) => (),
            Err(error) => {
                tracing::warn!("{error}");
                eprintln!("{error}");
            }
        }
    }

    tracing::debug!("Leaving STDIN loop");
    Ok(())
}

/// Carry out a command.
async fn apply(
    command: Command,
    controller: &gushing_rig::controller::ControllerHandle,
    system_motion: &SystemMotionPreference,
) {
    match command {
        Command::Input(event) => {
            let outcome = controller.input(&event).await;
            tracing::debug!("Input {event:?} handled with outcome: {outcome:?}");
        }
        Command::Motion(reduced) => system_motion.set(reduced),
        Command::Quit => (),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(line: &str) -> Option<Command> {
        Command::parse(line).unwrap()
    }

    #[test]
    fn pointer_commands() {
        assert_eq!(parse("click"), Some(Command::Input(InputEvent::Click)));
        assert_eq!(parse("  HOVER "), Some(Command::Input(InputEvent::Hover)));
    }

    #[test]
    fn key_commands() {
        assert_eq!(
            parse("key Enter"),
            Some(Command::Input(InputEvent::Key(Key::Enter)))
        );
        assert_eq!(
            parse("key space"),
            Some(Command::Input(InputEvent::Key(Key::Space)))
        );
        assert_eq!(
            parse("key Escape"),
            Some(Command::Input(InputEvent::Key(Key::Other("Escape".into()))))
        );
    }

    #[test]
    fn motion_commands() {
        assert_eq!(parse("motion reduce"), Some(Command::Motion(Some(true))));
        assert_eq!(
            parse("motion no-preference"),
            Some(Command::Motion(Some(false)))
        );
        assert_eq!(parse("motion unknown"), Some(Command::Motion(None)));
        assert!(Command::parse("motion wobbly").is_err());
    }

    #[test]
    fn motion_arguments_ignore_case() {
        assert_eq!(parse("motion Unknown"), Some(Command::Motion(None)));
        assert_eq!(parse("MOTION REDUCE"), Some(Command::Motion(Some(true))));
        assert_eq!(
            parse("motion No-Preference"),
            Some(Command::Motion(Some(false)))
        );
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
    }

    #[test]
    fn quit() {
        assert_eq!(parse("quit"), Some(Command::Quit));
        assert_eq!(parse("exit"), Some(Command::Quit));
    }

    #[test]
    fn unknown_commands_are_errors() {
        assert!(Command::parse("poke").is_err());
        assert!(Command::parse("key").is_err());
        assert!(Command::parse("click twice").is_err());
    }

    #[test]
    fn leftover_words_are_errors() {
        assert!(Command::parse("key Enter extra").is_err());
        assert!(Command::parse("motion reduce now").is_err());
        assert!(Command::parse("quit please").is_err());
    }
}
