//! Line-oriented interactive session.
//!
//! Each line typed is an input event: plain text replaces the city, `:N`
//! picks a suggestion, `:clear` empties the city, an empty line or `:go`
//! submits. Network completions re-render the view as soon as they arrive.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use weather_core::{Controller, Event, WeatherProvider, WeatherState, view::render};

const HELP: &str = "Type a city to search, :N to pick suggestion N, Enter or :go for the forecast, \
                    :clear to empty the city, :u to switch units, :q to quit.";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Query(String),
    Select(usize),
    Submit,
    ToggleUnit,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();

    match trimmed {
        "" | ":go" => return Input::Submit,
        ":u" | ":unit" => return Input::ToggleUnit,
        ":q" | ":quit" => return Input::Quit,
        ":clear" => return Input::Query(String::new()),
        ":h" | ":help" | "?" => return Input::Help,
        _ => {}
    }

    if let Some(n) = trimmed.strip_prefix(':').and_then(|n| n.parse::<usize>().ok()) {
        // Suggestions are shown 1-based.
        if n > 0 {
            return Input::Select(n - 1);
        }
    }

    // Only the line terminator is stripped; the query itself is kept as typed.
    Input::Query(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run(provider: Arc<dyn WeatherProvider>, state: WeatherState) -> anyhow::Result<()> {
    let mut controller = Controller::new(provider, state);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    print!("{}", render(controller.state()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                let event = match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => {
                        println!("{HELP}");
                        continue;
                    }
                    Input::Query(text) => Event::QueryChanged(text),
                    Input::Select(idx) => Event::SuggestionSelected(idx),
                    Input::Submit => Event::Submitted,
                    Input::ToggleUnit => Event::UnitToggled,
                };

                debug!(?event, "input");
                controller.dispatch(event);
            }
            Some(event) = controller.next_completion() => {
                controller.dispatch(event);
            }
        }

        println!();
        print!("{}", render(controller.state()));
    }

    Ok(())
}
