pub mod network;

pub use network::{PopulationStats, SocialGraph, SocialPaths, User, UserId};
