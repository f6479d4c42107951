pub mod observations_seed;

pub use observations_seed::seed_observations;
