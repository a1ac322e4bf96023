use campusmap::{
    CampusMap, ChannelGeolocation, DrawCommand, InputEvent, LocationSet, MapConfig,
    MemoryDocument, Point, Position, RenderContext,
};
use std::time::Duration;

const LOCATIONS: &str = r#"[
    {"id": "mb", "name": "Main Building", "short_name": "MB", "group_id": 1,
     "pixel_x": 2715, "pixel_y": 1787.5},
    {"id": "lib", "name": "Central Library", "short_name": "0", "group_id": 4,
     "pixel_x": 2850, "pixel_y": 1700},
    {"id": "h1", "name": "Hostel 1", "short_name": "H1", "group_id": 3,
     "pixel_x": 3900, "pixel_y": 1200}
]"#;

/// Drives a campus map without any UI: select a marker, follow a GPS reading
/// and print the resulting draw commands
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campusmap::init_logging();

    println!("🗺️ Campus Map Headless Example");
    println!("==============================");

    let config = MapConfig::from_json(
        r#"{"mapPath": "assets/map.jpg", "mapMinPath": "assets/map-min.jpg",
            "markersBase": "/assets/map/", "map_id": "map",
            "marker_id": "marker", "user_marker_id": "user-marker"}"#,
    )?;
    let document = MemoryDocument::with_elements(["map", "marker", "user-marker"]);
    let geolocation = ChannelGeolocation::new();
    let feeder = geolocation.feeder();

    let mut map = CampusMap::builder(config)
        .with_locations(LocationSet::from_json(LOCATIONS)?)
        .with_document(document.clone())
        .with_geolocation(geolocation)
        .on_select(|location| match location {
            Some(location) => println!("   📍 selected {}", location.name),
            None => println!("   📍 selection cleared"),
        })
        .on_following_change(|following| println!("   🧭 following: {}", following))
        .build()?;

    println!("✅ Map created with {} locations", map.locations().len());
    println!(
        "   Center: ({:.1}, {:.1}) at zoom {}",
        map.viewport().center().x,
        map.viewport().center().y,
        map.viewport().zoom()
    );

    println!("\n🖱️ Clicking the center of the map:");
    map.handle_input(InputEvent::Click {
        position: Point::new(400.0, 300.0),
    })?;
    map.advance(Duration::from_millis(1000));
    println!(
        "   View now at ({:.1}, {:.1}) zoom {}",
        map.viewport().center().x,
        map.viewport().center().y,
        map.viewport().zoom()
    );

    map.handle_input(InputEvent::PointerMove {
        position: Point::new(400.0, 300.0),
    })?;
    println!("   Cursor over marker: {:?}", document.cursor("map"));

    println!("\n🛰️ Tracking a GPS reading:");
    map.start_gps()?;
    feeder.push(Position::new(19.13, 72.915).with_accuracy(8.0));
    if let Some(fix) = map.next_gps_fix().await? {
        println!("   User at pixel ({}, {})", fix.pixel.x, fix.pixel.y);
    }
    map.advance(Duration::from_millis(1000));

    map.set_residences_visible(true);

    println!("\n🎨 Rendering a frame:");
    let mut ctx = RenderContext::new();
    map.render(&mut ctx)?;
    for command in ctx.commands() {
        match command {
            DrawCommand::Image { url, opacity, .. } => {
                println!("   image {} (opacity {})", url, opacity)
            }
            DrawCommand::Icon { position, style } => {
                println!("   icon {} at ({:.0}, {:.0})", style.src, position.x, position.y)
            }
            DrawCommand::Text { position, style } => {
                println!("   label {:?} at ({:.0}, {:.0})", style.text, position.x, position.y)
            }
            DrawCommand::Overlay {
                element_id,
                position,
                ..
            } => println!("   #{} at ({:.0}, {:.0})", element_id, position.x, position.y),
        }
    }

    map.stop_gps();
    println!("\n✅ Headless example finished");
    Ok(())
}
