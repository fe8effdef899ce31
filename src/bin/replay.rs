//! Replays a JSON-lines event log against a fresh session.
//!
//! Each input line is one serialized `Event`. Prints the state hash after
//! every event and the chart readout whenever it is set.

use std::io::{self, BufRead};

use anyhow::Result;
use onepager::config::ViewConfig;
use onepager::data::Dataset;
use onepager::engine::events::Event;
use onepager::engine::session::Session;

fn main() -> Result<()> {
    let cfg = ViewConfig::default();
    cfg.apply_logging();
    let mut session = Session::new(Dataset::builtin(), cfg)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines().map_while(|l| l.ok()) {
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(err) => {
                eprintln!("bad event json: {}", err);
                continue;
            }
        };
        let kind = event.kind();
        let ts = event.timestamp();
        // Timers due before this event fire first.
        session.advance_to(ts);
        let hash = session.dispatch(event);
        let view = session.view();
        match view.chart.readout {
            Some(readout) => println!("seq={} kind={} hash={:016x} {}", session.state().seq, kind, hash, readout),
            None => println!("seq={} kind={} hash={:016x}", session.state().seq, kind, hash),
        }
    }

    session.settle();
    let flipped: Vec<&str> = session
        .state()
        .flips
        .iter()
        .filter(|(_, f)| *f)
        .map(|(id, _)| id)
        .collect();
    println!(
        "final hash={:016x} renders={} flipped={:?} violations={}",
        session.last_hash(),
        session.render_count(),
        flipped,
        session.violations().len()
    );
    Ok(())
}
