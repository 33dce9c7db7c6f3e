use geostreams::activity::{ASObject, ActivityObject, Collection, Event};
use geostreams::geojson::{Feature, FeatureCollection, GeoObject, GeometryCollection, LineString, Point};
use geostreams::{Model, Position, activity_registry, geojson_registry, json};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== geostreams - Getting Started ===\n");

    // === GEOJSON OBJECTS ===
    println!("1. Building GeoJSON Objects");
    println!("---------------------------");

    // Positions are (lon, lat) with an optional altitude
    let nyc = Point::new(Position::new(-74.0060, 40.7128))?;
    let london = Point::new(Position::new(-0.1278, 51.5074))?;
    let route = LineString::new(vec![
        Position::new(-74.0060, 40.7128),
        Position::new(-0.1278, 51.5074),
    ])?;
    println!("   Built {} and {}", nyc.type_name(), route.type_name());

    let collection = GeometryCollection::builder()
        .add(nyc.clone())
        .add(london)
        .add(route)
        .build()?
        .with_bounding_box()?;
    println!("   Collection of {} geometries", collection.len());
    if let Some(bbox) = collection.bounding_box() {
        println!("   Bounding box: {:?}\n", bbox.to_flat());
    }

    // === FEATURES ===
    println!("2. Features");
    println!("-----------");

    let cities = FeatureCollection::builder()
        .add(
            Feature::builder()
                .geometry(nyc)
                .property("name", "New York")
                .property("population", 8_300_000)
                .build()?,
        )
        .build()?;
    println!("   {}\n", json::to_string(&cities)?);

    // === ROUND TRIP ===
    println!("3. JSON Round Trip");
    println!("------------------");

    let text = json::to_string_pretty(&collection)?;
    let parsed: GeometryCollection = json::from_str(geojson_registry(), &text)?;
    println!("   Parsed collection equals original: {}", parsed == collection);

    // Integer coordinates reconstruct equal to float ones
    let point: Point = json::from_str(geojson_registry(), r#"{"type":"Point","coordinates":[10,5]}"#)?;
    println!("   Parsed point: {:?}\n", point.position());

    // === ACTIVITY STREAMS ===
    println!("4. Activity Streams Events");
    println!("--------------------------");

    let guests = Collection::builder()
        .add(ASObject::builder("person").display_name("Ann").build()?)
        .add(ASObject::builder("person").display_name("Bo").build()?)
        .build()?;
    let event = Event::builder()
        .display_name("Launch party")
        .attending(guests)
        .build()?;

    let text = json::to_string(&event)?;
    let parsed: Event = json::from_str(activity_registry(), &text)?;
    println!("   Event: {}", parsed.display_name().unwrap_or_default());
    for guest in parsed.attending().map(|c| c.items()).unwrap_or_default() {
        println!("     attending: {}", guest.display_name().unwrap_or_default());
    }
    println!(
        "   Invited collection set: {}",
        parsed.invited().is_some()
    );

    println!("\n=== Done ===");
    Ok(())
}
