use rideshare_engine::RideShare;
use rideshare_engine::domain::{Location, PlateNumber, RideId, Route, UserName, VehicleClass};
use rideshare_engine::matching::{MatchConfig, Preference};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

type Error = Box<dyn std::error::Error>;

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn route(from: &str, to: &str) -> Result<Route, Error> {
    Ok(Route::new(Location::new(from)?, Location::new(to)?))
}

/// Replays the onboarding, offers, selections and multi-hop request of the
/// standard walkthrough against a fresh engine.
fn walkthrough(engine: &RideShare) -> Result<(), Error> {
    let users = [
        ("Rohan", 36, "M"),
        ("Shashank", 29, "M"),
        ("Nandini", 29, "F"),
        ("Shipra", 27, "F"),
        ("Gaurav", 29, "M"),
        ("Rahul", 35, "M"),
    ];
    for (name, age, sex) in users {
        engine.register_user(UserName::new(name)?, age, sex);
    }

    let vehicles = [
        ("Rohan", "Swift", "KA-01-12345"),
        ("Shashank", "Baleno", "TS-05-62395"),
        ("Shipra", "Polo", "KA-05-41491"),
        ("Shipra", "Activa", "KA-12-12332"),
        ("Rahul", "XUV", "KA-05-1234"),
    ];
    for (owner, class, plate) in vehicles {
        engine.register_vehicle(
            &UserName::new(owner)?,
            VehicleClass::new(class)?,
            PlateNumber::new(plate)?,
        );
    }

    let offers = [
        ("Rohan", "Hyderabad", "Bangalore", 1, "Swift", "KA-01-12345"),
        ("Shipra", "Bangalore", "Mysore", 1, "Activa", "KA-12-12332"),
        ("Shipra", "Bangalore", "Mysore", 2, "Polo", "KA-05-41491"),
        ("Shashank", "Hyderabad", "Bangalore", 2, "Baleno", "TS-05-62395"),
        ("Rahul", "Hyderabad", "Bangalore", 5, "XUV", "KA-05-1234"),
        ("Rohan", "Bangalore", "Pune", 1, "Swift", "KA-01-12345"),
    ];
    for (driver, from, to, seats, class, plate) in offers {
        match engine.offer_ride(
            &UserName::new(driver)?,
            route(from, to)?,
            seats,
            &VehicleClass::new(class)?,
            &PlateNumber::new(plate)?,
        ) {
            Ok(ride) => info!(%ride, driver, from, to, seats, "offered"),
            Err(e) => error!(driver, from, to, "offer rejected: {e}"),
        }
    }

    let selections = [
        ("Nandini", "Bangalore", "Mysore", 1, None),
        ("Gaurav", "Bangalore", "Mysore", 1, Some("Activa")),
        ("Shashank", "Mumbai", "Bangalore", 1, None),
        ("Rohan", "Hyderabad", "Bangalore", 1, Some("Baleno")),
        ("Shashank", "Hyderabad", "Bangalore", 1, Some("Polo")),
    ];
    for (passenger, from, to, seats, class) in selections {
        let preference = match class {
            Some(class) => Preference::class(VehicleClass::new(class)?),
            None => Preference::most_vacant(),
        };
        let picked =
            engine.select_ride(&UserName::new(passenger)?, &route(from, to)?, seats, &preference)?;
        match picked {
            Some(ride) => info!(passenger, from, to, %ride, "selected"),
            None => info!(passenger, from, to, "no ride found"),
        }
    }

    for stats in engine.list_stats() {
        info!("{stats}");
    }

    for id in 1..=6 {
        match engine.end_ride(RideId(id)) {
            Ok(ended) => info!(ride = id, ended, "end ride"),
            Err(e) => error!(ride = id, "cannot end ride: {e}"),
        }
    }

    let rides = engine.select_multi_hop_ride(
        &UserName::new("Shipra")?,
        &route("Hyderabad", "Mysore")?,
        1,
    )?;
    info!(?rides, "multi-hop selection");

    println!("{}", serde_json::to_string_pretty(&engine.list_stats())?);
    Ok(())
}

fn main() {
    setup_logging();

    let engine = RideShare::new(MatchConfig::default());
    if let Err(e) = walkthrough(&engine) {
        error!("walkthrough failed: {e}");
        std::process::exit(1);
    }
}
