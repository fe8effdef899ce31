use anyhow::Result;
use onepager::config::ViewConfig;
use onepager::data::Dataset;
use onepager::engine::events::{ClickEvent, Event};
use onepager::logging::{log, obj, v_num, v_str, Domain, Level};
use onepager::render::{CARD_SET, MARKET_SET, SOURCES_SET, TEAM_SET, WRITEUP_SET};
use onepager::runtime::{Runtime, RuntimeHandle, StaticLogoLoader};
use tokio::time::{sleep, Duration};

/// Scripted visitor: scrolls the page, hovers the chart, flips a few cards.
async fn visit(handle: RuntimeHandle, markers: Vec<(f64, f64)>) {
    let pause = |ms| sleep(Duration::from_millis(ms));

    handle.post(Event::mount);
    pause(300).await;
    handle.post(|ts| Event::viewport_enter(ts, WRITEUP_SET));
    handle.post(|ts| Event::Click(ClickEvent::Accordion { ts, item: "strategy".into() }));
    pause(400).await;

    handle.post(|ts| Event::viewport_enter(ts, MARKET_SET));
    for (x, y) in &markers {
        pause(120).await;
        let (x, y) = (*x, *y);
        handle.post(move |ts| Event::pointer_move(ts, x, y));
    }
    pause(120).await;
    handle.post(Event::pointer_leave);

    handle.post(|ts| Event::viewport_enter(ts, CARD_SET));
    pause(200).await;
    handle.post(|ts| Event::click_card(ts, "OpenAI"));
    handle.post(|ts| Event::click_card(ts, "Hugging Face"));
    pause(700).await;
    handle.post(|ts| Event::click_card(ts, "OpenAI"));
    handle.post(|ts| Event::Click(ClickEvent::EdgeSwitch { ts }));

    handle.post(|ts| Event::viewport_enter(ts, TEAM_SET));
    handle.post(|ts| Event::viewport_enter(ts, SOURCES_SET));
    pause(150).await;
    handle.post(Event::unmount);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cfg = ViewConfig::default();
    cfg.apply_logging();

    let dataset = Dataset::builtin();
    log(
        Level::Info,
        Domain::Dataset,
        "loaded",
        obj(&[
            ("digest", v_str(&dataset.digest()?)),
            ("providers", v_num(dataset.providers.len() as f64)),
        ]),
    );

    // One logo is missing on purpose so the placeholder path is visible.
    let available: Vec<&str> = dataset
        .providers
        .iter()
        .filter(|p| p.name != "Stability AI")
        .map(|p| p.logo_ref.as_str())
        .collect();
    let loader = StaticLogoLoader::new(available, Duration::from_millis(50));

    let mut rt = Runtime::new(dataset, cfg, loader)?;
    let markers = rt
        .state()
        .chart
        .geometry()
        .markers()
        .iter()
        .map(|m| (m.cx, m.cy))
        .collect();
    tokio::spawn(visit(rt.handle(), markers));

    rt.run().await;

    let view = rt.view();
    log(
        Level::Info,
        Domain::Runtime,
        "summary",
        obj(&[
            ("renders", v_num(rt.render_count() as f64)),
            ("state_hash", v_str(&format!("{:016x}", rt.state().hash()))),
        ]),
    );
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
