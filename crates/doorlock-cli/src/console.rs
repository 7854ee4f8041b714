//! Console commands for driving the mock inputs from stdin.
//!
//! Lines starting with `!` act on the button or the card reader. Any other
//! line is sent to the serial link as if it came from the Bluetooth module.

use anyhow::{Context, Result, bail};
use doorlock_core::Credential;
use doorlock_hardware::{CardData, TagFamily};

/// SAK of a MIFARE Classic 1K, used when `!card` names no SAK.
const DEFAULT_SAK: u8 = 0x08;

pub const HELP: &str = "\
commands:
  !press               press the button once
  !hold / !release     hold the button down / let it go
  !card <uid> [sak]    present a card (uid in hex, sak in hex, default 08)
  !quit                stop the controller
  <anything else>      send the line on the serial link";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Press,
    Hold,
    Release,
    Card(CardData),
    Help,
    Quit,
    Line(String),
}

/// Parse one console line.
pub fn parse(line: &str) -> Result<Command> {
    let Some(rest) = line.strip_prefix('!') else {
        return Ok(Command::Line(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let command = match words.next().unwrap_or_default() {
        "press" => Command::Press,
        "hold" => Command::Hold,
        "release" => Command::Release,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "card" => {
            let uid = words.next().context("!card needs a UID")?;
            let uid = Credential::from_hex(uid)?.as_bytes().to_vec();
            let sak = match words.next() {
                Some(sak) => u8::from_str_radix(sak.trim_start_matches("0x"), 16)
                    .with_context(|| format!("invalid SAK {sak:?}"))?,
                None => DEFAULT_SAK,
            };
            Command::Card(CardData::new(uid, sak)?)
        }
        other => bail!("unknown command !{other} (try !help)"),
    };

    if words.next().is_some() {
        bail!("too many arguments");
    }
    Ok(command)
}

/// Family name for a card about to be presented, for the console echo.
pub fn describe(card: &CardData) -> String {
    let note = match card.family {
        family if family.is_mifare_classic() => "",
        TagFamily::Unknown(_) => " (unknown family)",
        _ => " (not MIFARE Classic)",
    };
    format!("{} [{}]{}", card.uid_hex(), card.family.name(), note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("!press", Command::Press)]
    #[case("!hold", Command::Hold)]
    #[case("!release", Command::Release)]
    #[case("!quit", Command::Quit)]
    #[case("!help", Command::Help)]
    fn test_simple_commands(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(parse(line).unwrap(), expected);
    }

    #[test]
    fn test_plain_line_goes_to_serial() {
        assert_eq!(
            parse("SECRET1").unwrap(),
            Command::Line("SECRET1".to_string())
        );
    }

    #[test]
    fn test_card_defaults_to_classic_1k() {
        let Command::Card(card) = parse("!card AA:BB:CC:DD").unwrap() else {
            panic!("expected a card");
        };
        assert_eq!(card.uid, vec![0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(card.family, TagFamily::Mifare1K);
    }

    #[test]
    fn test_card_with_sak() {
        let Command::Card(card) = parse("!card 04112233445566 0x00").unwrap() else {
            panic!("expected a card");
        };
        assert_eq!(card.uid.len(), 7);
        assert_eq!(card.family, TagFamily::MifareUltralight);
        assert!(describe(&card).ends_with("(not MIFARE Classic)"));
    }

    #[rstest]
    #[case("!card")]
    #[case("!card ZZZZ")]
    #[case("!card AABB")]
    #[case("!card AABBCCDD 1FF")]
    #[case("!press now")]
    #[case("!open")]
    fn test_invalid_commands(#[case] line: &str) {
        assert!(parse(line).is_err());
    }
}
