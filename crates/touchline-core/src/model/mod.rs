pub mod club;
pub mod fixture;

pub use club::{Address, Club, ClubSet, Social};
pub use fixture::{Fixture, FixtureData, FixtureKey};
