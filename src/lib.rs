//! Skillset difficulty ratings for rhythm game charts.
//!
//! A chart is rated on eight skillsets: overall, stream, jumpstream,
//! handstream, stamina, jackspeed, chordjack, and technical. Overall
//! combines the other seven.
//!
//! Two queries are available:
//! - MSD: the chart rated at every music rate of [`RATE_LADDER`], 0.7x up to
//!   2.0x in steps of 0.1.
//! - SSR: the chart rated at a single music rate and calibrated to a score
//!   goal, i.e. the rating a player needs to reach that score.
//!
//! ## Usage
//!
//! ```
//! use msd_calc::{Calc, Chart, NoteEvent, Skillset};
//!
//! // A simple stream: one note every 125ms cycling through four columns
//! let notes: Vec<_> = (0..100)
//!     .map(|i| NoteEvent::tap(f64::from(i) * 0.125, (i % 4) as u32))
//!     .collect();
//!
//! let chart = Chart::new(&notes).unwrap();
//! let mut calc = Calc::new();
//!
//! let msd = calc.rate_all(&chart).unwrap();
//! let native = msd.native();
//!
//! assert_eq!(native.dominant_skillset(), Skillset::Stream);
//! assert_eq!(native.jumpstream, 0.0);
//!
//! // 1.2x, aiming for 93%
//! let ssr = calc.rate_at(&chart, 1.2, 93.0).unwrap();
//!
//! assert!(ssr.convergence.is_converged());
//! assert!(ssr.skillsets.stream > 0.0);
//! ```
//!
//! ## Features
//!
//! | Flag | Description | Dependencies
//! | - | - | -
//! | `default` | Enables the `parallel` feature |
//! | `parallel` | Rates the entries of the rate ladder in parallel | [`rayon`]
//! | `serde` | Implements `Serialize` and `Deserialize` for result and config types | [`serde`]
//!
//! [`rayon`]: https://docs.rs/rayon
//! [`serde`]: https://docs.rs/serde

#![deny(rustdoc::broken_intra_doc_links, rustdoc::missing_crate_level_docs)]

#[doc(inline)]
pub use self::{
    attributes::{
        Convergence, MsdForAllRates, RatingBreakdown, Skillset, SkillsetScores, SsrRating,
        WindowRating,
    },
    config::CalcConfig,
    difficulty::{inspect, rate_all, rate_at},
    error::{ChartError, RatingError},
    model::{
        chart::{Chart, Row},
        note::{NoteEvent, NoteKind},
        rate::{rate_from_mods, MAX_RATE, MIN_RATE, NATIVE_RATE_INDEX, RATE_LADDER},
    },
    pool::CalcPool,
    session::Calc,
};

pub use rosu_mods::GameModsLegacy;

/// Result types of rating queries.
pub mod attributes;

/// Configuration shared by rating queries.
pub mod config;

/// The rating pipeline from rate-scaled rows to skillset scores.
pub mod difficulty;

/// Error types.
pub mod error;

/// Input types and the music rate ladder.
pub mod model;

mod pool;
mod session;
mod util;

/// Version of the rating algorithm.
///
/// Ratings of different versions are not comparable.
pub const CALC_VERSION: i32 = 1;

/// Version of the rating algorithm, see [`CALC_VERSION`].
pub const fn calc_version() -> i32 {
    CALC_VERSION
}
