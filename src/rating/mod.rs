pub mod elo;

pub use elo::rating_delta;
