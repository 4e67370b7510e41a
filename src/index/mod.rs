pub mod cache;

pub mod configuration;
pub use configuration::*;

pub mod deal;
pub use deal::*;

pub mod error;
pub use error::*;

pub mod indexer;
pub use indexer::*;

pub mod permutation;
pub use permutation::*;

pub mod recall;
pub use recall::*;

pub mod round;
pub use round::*;

pub mod schedule;
pub use schedule::*;

pub mod state;
pub use state::*;

pub mod tables;
pub use tables::*;
