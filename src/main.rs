//! Target Range entry point
//!
//! The web build is driven by the host page through `platform::web`. The
//! native binary runs a scripted headless session so the engine can be
//! exercised and logged without a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use target_range::{Settings, TargetRange, sim::Viewport};

    env_logger::init();
    log::info!("Target Range (native) starting...");
    log::info!("Rendering needs the host page - this run drives the engine headless");

    let mut range = TargetRange::new(Settings::default(), Viewport::new(1920.0, 1080.0), 2024);

    // Optional property payload, same JSON the wallpaper host sends
    if let Some(json) = std::env::args().nth(1) {
        match range.apply_properties_json(&json) {
            Ok(change) => log::info!("Applied properties: {:?}", change),
            Err(e) => log::error!("Ignoring properties: {}", e),
        }
    }

    run_session(&mut range);
}

#[cfg(not(target_arch = "wasm32"))]
fn run_session(range: &mut target_range::TargetRange) {
    use glam::Vec2;
    use target_range::RangeEvent;

    println!("\n{:?} mode, {} balls", range.mode(), range.count());

    if range.mode().is_headshot() {
        range.toggle_mode();
    }
    println!("{:?} mode, {} balls", range.mode(), range.count());

    // Pop a few targets by clicking on them
    let mut popped = 0;
    for _ in 0..10 {
        let Some(target) = range.balls().first().copied() else {
            break;
        };
        if range.click(target.pos).is_some() {
            popped += 1;
        }
    }
    println!("Popped {} balls, {} remain", popped, range.count());

    // Draw and confirm a spawn region in the upper-right quadrant
    range.press_area_button();
    range.pointer_down(Vec2::new(10.0, 5.0));
    range.pointer_move(Vec2::new(40.0, 25.0));
    range.pointer_up(Vec2::new(60.0, 40.0));
    range.press_area_button();
    let region = range.region();
    let inside = range.balls().iter().filter(|b| region.contains(b.pos)).count();
    println!(
        "Region {:?}: {}/{} balls inside",
        region.as_rect(),
        inside,
        range.count()
    );

    let saturated = range
        .drain_events()
        .iter()
        .filter(|e| matches!(e, RangeEvent::BallSpawned { saturated: true, .. }))
        .count();
    println!("Saturated placements: {}", saturated);

    range.press_area_button();
    println!("Region cleared: {:?}, {} balls", range.region_state(), range.count());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
