use chrono::{DateTime, Duration, Utc};
use mongodb::bson::oid::ObjectId;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::database::ObservationStore;
use crate::models::{GeoPoint, SpeciesObservation, WaterQuality};
use crate::utils::AppError;

pub const DEFAULT_COUNT: usize = 100;
const JITTER_DEGREES: f64 = 1.5;
const HISTORY_DAYS: i64 = 30;

/// Region name and its approximate center.
pub const REGIONS: [(&str, f64, f64); 8] = [
    ("Great Barrier Reef", -18.2871, 147.6992),
    ("Coral Triangle", -2.0, 125.0),
    ("Mediterranean Sea", 35.0, 18.0),
    ("Caribbean Sea", 15.0, -75.0),
    ("Red Sea", 22.0, 38.0),
    ("Monterey Bay", 36.7783, -122.0),
    ("Maldives", 3.2028, 73.2207),
    ("Arabian Sea", 14.0, 65.0),
];

pub const SPECIES: [&str; 12] = [
    "Green Sea Turtle",
    "Hawksbill Turtle",
    "Whale Shark",
    "Manta Ray",
    "Bottlenose Dolphin",
    "Humpback Whale",
    "Clownfish",
    "Blue Tang",
    "Napoleon Wrasse",
    "Reef Manta",
    "Dugong",
    "Giant Clam",
];

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn clamp_coordinates(lat: f64, lon: f64) -> GeoPoint {
    let mut lon = lon;
    if lon > 180.0 {
        lon -= 360.0;
    } else if lon < -180.0 {
        lon += 360.0;
    }
    GeoPoint {
        latitude: round_to(lat.clamp(-90.0, 90.0), 4),
        longitude: round_to(lon, 4),
    }
}

fn random_water_quality<R: Rng + ?Sized>(rng: &mut R) -> WaterQuality {
    WaterQuality {
        ph: round_to(rng.gen_range(7.6..8.4), 2),
        temperature: round_to(rng.gen_range(18.0..31.0), 1),
        salinity: round_to(rng.gen_range(32.0..38.0), 1),
        dissolved_oxygen: round_to(rng.gen_range(4.5..8.5), 1),
        turbidity: round_to(rng.gen_range(0.1..5.0), 2),
    }
}

/// Builds `count` random observations spread over the last 30 days before
/// `now`.
pub fn generate_observations<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<SpeciesObservation> {
    let window = Duration::days(HISTORY_DAYS).num_seconds();

    (0..count)
        .map(|_| {
            let (region, lat, lon) = *REGIONS.choose(rng).unwrap_or(&REGIONS[0]);
            let species = *SPECIES.choose(rng).unwrap_or(&SPECIES[0]);
            let observed_at = now.timestamp() - rng.gen_range(0..window);

            SpeciesObservation {
                id: Some(ObjectId::new()),
                region: region.to_string(),
                species: species.to_string(),
                count: rng.gen_range(1..=50),
                water_quality: random_water_quality(rng),
                location: clamp_coordinates(
                    lat + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
                    lon + rng.gen_range(-JITTER_DEGREES..JITTER_DEGREES),
                ),
                observed_at,
                created_at: now.timestamp(),
            }
        })
        .collect()
}

/// Writes `count` fresh observations. Unless `keep_existing` is set, the
/// documents that were there before are removed once the new batch is in,
/// so a failed insert leaves the old data untouched.
pub async fn seed_observations(
    store: &dyn ObservationStore,
    count: usize,
    keep_existing: bool,
) -> Result<usize, AppError> {
    let observations = {
        let mut rng = rand::thread_rng();
        generate_observations(&mut rng, count, Utc::now())
    };

    let inserted = match store.insert_many(&observations).await {
        Ok(inserted) => inserted,
        Err(e) => {
            log::warn!("⚠️  Insert failed, existing observations were left in place: {}", e);
            return Err(e);
        }
    };
    log::info!("🌱 Inserted {} species observations", inserted);

    if !keep_existing {
        let fresh: Vec<ObjectId> = observations.iter().filter_map(|o| o.id).collect();
        let removed = store.delete_except(&fresh).await?;
        log::info!("🧹 Removed {} previous observations", removed);
    }

    Ok(inserted)
}
