use std::path::PathBuf;

use clap::Args;
use dreadroom_core::{Action, Session, TracingSink};

use crate::common::{load_config, parse_actions, print_json};

#[derive(Args)]
pub struct SimulateArgs {
    /// Config file to use instead of the user's
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scripted command as `<ms>:<command>`, e.g. `--at "30000:key 538927E"`.
    /// Defaults to a single `0:look`.
    #[arg(long = "at", value_name = "MS:COMMAND")]
    steps: Vec<String>,
    /// Stop the clock here. Defaults to one tick past the hidden deadline
    /// measured from the last scripted command.
    #[arg(long)]
    until_ms: Option<u64>,
}

fn parse_step(raw: &str) -> Result<(u64, Vec<Action>), String> {
    let (at, command) = raw
        .split_once(':')
        .ok_or_else(|| format!("'{raw}' is not <ms>:<command>"))?;
    let at = at
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("'{at}' is not a time in milliseconds"))?;
    Ok((at, parse_actions(command)?))
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;

    let mut steps = args
        .steps
        .iter()
        .map(|s| parse_step(s))
        .collect::<Result<Vec<_>, _>>()?;
    if steps.is_empty() {
        steps.push((0, vec![Action::Interact]));
    }
    // Stable: same-time steps keep their command-line order.
    steps.sort_by_key(|(at, _)| *at);

    let last_step = steps.last().map(|(at, _)| *at).unwrap_or(0);
    let until = args.until_ms.unwrap_or_else(|| {
        last_step
            .saturating_add(config.tension.deadline_ms())
            .saturating_add(config.tension.tick_period_ms)
    });

    let mut session = Session::new(&config, TracingSink)?;
    for (at, actions) in steps {
        if at > until {
            break;
        }
        for action in actions {
            for event in session.apply(action, at)? {
                print_json(&event)?;
            }
        }
    }
    for event in session.advance_to(until) {
        print_json(&event)?;
    }
    print_json(&session.snapshot())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timed_step() {
        let (at, actions) = parse_step("1500:lock 2").unwrap();
        assert_eq!(at, 1_500);
        assert_eq!(actions, vec![Action::TurnLock { wheel: 2 }]);
    }

    #[test]
    fn rejects_step_without_time() {
        assert!(parse_step("look").is_err());
        assert!(parse_step("soon:look").is_err());
    }
}
