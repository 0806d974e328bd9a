//! Shared helpers for CLI commands.

use std::path::Path;

use dreadroom_core::{Action, Config};
use serde::Serialize;

/// Load `path` if given, otherwise the user's config file.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => Config::load_from(p)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Parse one player command.
///
/// `look`, `talk`, `lock <wheel>`, `key <keys>`, `arm`, `disarm` and `die`. A key string
/// presses every character in order, so `key 538927E` enters the code.
pub fn parse_actions(input: &str) -> Result<Vec<Action>, String> {
    let mut words = input.split_whitespace();
    let verb = words.next().ok_or("empty command")?;
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments in '{input}'"));
    }

    match (verb, arg) {
        ("look", None) => Ok(vec![Action::Interact]),
        ("talk", None) => Ok(vec![Action::Dialogue]),
        ("die", None) => Ok(vec![Action::ForceDeath]),
        ("arm", None) => Ok(vec![Action::Arm]),
        ("disarm", None) => Ok(vec![Action::Disarm]),
        ("lock", Some(wheel)) => {
            let wheel = wheel
                .parse::<usize>()
                .map_err(|_| format!("'{wheel}' is not a wheel number"))?;
            Ok(vec![Action::TurnLock { wheel }])
        }
        ("key", Some(keys)) => Ok(keys.chars().map(|key| Action::PressKey { key }).collect()),
        _ => Err(format!("unknown command '{input}'")),
    }
}

/// Print one JSON document on its own line.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
