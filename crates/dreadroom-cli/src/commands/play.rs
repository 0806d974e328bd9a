use std::path::PathBuf;

use clap::Args;
use dreadroom_core::{spawn_session, Event, Session, TracingSink};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::common::{load_config, parse_actions, print_json};

#[derive(Args)]
pub struct PlayArgs {
    /// Config file to use instead of the user's
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;
    let session = Session::new(&config, TracingSink)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(play(session))
}

async fn play(session: Session<TracingSink>) -> Result<(), Box<dyn std::error::Error>> {
    let handle = spawn_session(session);
    let mut events = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("commands: look | talk | lock <wheel> | key <keys> | arm | disarm | die | status | quit");
    loop {
        tokio::select! {
            received = events.recv() => match received {
                Ok(stamped) => {
                    print_json(&stamped)?;
                    if matches!(stamped.event, Event::Died { .. } | Event::Escaped { .. }) {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "event output fell behind");
                }
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                match line {
                    "" => {}
                    "quit" => break,
                    "status" => print_json(&handle.snapshot().await?)?,
                    command => match parse_actions(command) {
                        Ok(actions) => {
                            for action in actions {
                                // Events arrive through the subscription.
                                if let Err(e) = handle.act(action).await {
                                    eprintln!("error: {e}");
                                }
                            }
                        }
                        Err(e) => eprintln!("error: {e}"),
                    },
                }
            }
        }
    }

    let snapshot = handle.shutdown().await?;
    print_json(&snapshot)?;
    Ok(())
}
