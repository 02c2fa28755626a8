use std::collections::{HashMap, VecDeque};

use rosu_mods::GameModsLegacy;

use crate::{
    attributes::{MsdForAllRates, RatingBreakdown, SsrRating},
    config::CalcConfig,
    difficulty,
    error::RatingError,
    model::{chart::Chart, note::NoteEvent, rate::rate_from_mods},
    CALC_VERSION,
};

/// A rating session.
///
/// Holds the configuration and a cache of previous results. Queries take
/// `&mut self` so a session serves one thread of control at a time; use
/// one session per thread or a [`CalcPool`](crate::CalcPool) to rate from
/// multiple threads.
///
/// After [`Calc::close`] every query fails with
/// [`RatingError::HandleMisuse`].
///
/// # Example
///
/// ```
/// use msd_calc::{Calc, NoteEvent};
///
/// let notes: Vec<_> = (0..64)
///     .map(|i| NoteEvent::tap(f64::from(i) * 0.125, (i % 4) as u32))
///     .collect();
///
/// let mut calc = Calc::new();
/// let msd = calc.calc_msd(&notes).unwrap();
/// let ssr = calc.calc_ssr(&notes, 1.0, 93.0).unwrap();
///
/// assert_eq!(msd.msds.len(), 14);
/// assert!(ssr.skillsets.overall > 0.0);
/// ```
#[derive(Debug)]
pub struct Calc {
    config: CalcConfig,
    cache: Option<RatingCache>,
}

impl Calc {
    pub fn new() -> Self {
        Self::with_config(CalcConfig::default())
    }

    pub fn with_config(config: CalcConfig) -> Self {
        let cache = RatingCache::new(config.get_cache_capacity());

        Self {
            config,
            cache: Some(cache),
        }
    }

    pub const fn config(&self) -> &CalcConfig {
        &self.config
    }

    /// The version of the rating algorithm.
    pub const fn version(&self) -> i32 {
        CALC_VERSION
    }

    pub const fn is_open(&self) -> bool {
        self.cache.is_some()
    }

    /// Releases all retained state.
    ///
    /// Closing an already closed session does nothing.
    pub fn close(&mut self) {
        if let Some(cache) = self.cache.take() {
            tracing::debug!(cached = cache.len(), "closed session");
        }
    }

    fn cache(&mut self) -> Result<&mut RatingCache, RatingError> {
        self.cache.as_mut().ok_or(RatingError::HandleMisuse)
    }

    /// Rates `chart` at every entry of the rate ladder.
    pub fn rate_all(&mut self, chart: &Chart) -> Result<MsdForAllRates, RatingError> {
        let key = CacheKey::All {
            fingerprint: chart.fingerprint(),
        };

        if let Some(CachedRating::All(msd)) = self.cache()?.get(&key) {
            return Ok(*msd);
        }

        let msd = difficulty::rate_all(chart, &self.config)?;
        self.cache()?.insert(key, CachedRating::All(msd));

        Ok(msd)
    }

    /// Rates `chart` at `rate`, calibrated to `score_goal` percent.
    pub fn rate_at(
        &mut self,
        chart: &Chart,
        rate: f64,
        score_goal: f64,
    ) -> Result<SsrRating, RatingError> {
        let key = CacheKey::At {
            fingerprint: chart.fingerprint(),
            rate: rate.to_bits(),
            score_goal: score_goal.to_bits(),
        };

        if let Some(CachedRating::At(ssr)) = self.cache()?.get(&key) {
            return Ok(*ssr);
        }

        let ssr = difficulty::rate_at(chart, rate, score_goal, &self.config)?;
        self.cache()?.insert(key, CachedRating::At(ssr));

        Ok(ssr)
    }

    /// Rates `chart` at the clock rate of the given mods.
    pub fn rate_with_mods(
        &mut self,
        chart: &Chart,
        mods: GameModsLegacy,
        score_goal: f64,
    ) -> Result<SsrRating, RatingError> {
        self.rate_at(chart, rate_from_mods(mods), score_goal)
    }

    /// Normalizes `notes` and rates them at every entry of the rate ladder.
    pub fn calc_msd(&mut self, notes: &[NoteEvent]) -> Result<MsdForAllRates, RatingError> {
        self.cache()?;
        let chart = Chart::new(notes)?;

        self.rate_all(&chart)
    }

    /// Normalizes `notes` and rates them at `rate`, calibrated to
    /// `score_goal` percent.
    pub fn calc_ssr(
        &mut self,
        notes: &[NoteEvent],
        rate: f64,
        score_goal: f64,
    ) -> Result<SsrRating, RatingError> {
        self.cache()?;
        let chart = Chart::new(notes)?;

        self.rate_at(&chart, rate, score_goal)
    }

    /// Per-window values of a rating. Results are not cached.
    pub fn inspect(&mut self, chart: &Chart, rate: f64) -> Result<RatingBreakdown, RatingError> {
        self.cache()?;

        difficulty::inspect(chart, rate, &self.config)
    }
}

impl Default for Calc {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum CacheKey {
    All {
        fingerprint: u64,
    },
    At {
        fingerprint: u64,
        rate: u64,
        score_goal: u64,
    },
}

#[derive(Copy, Clone, Debug)]
enum CachedRating {
    All(MsdForAllRates),
    At(SsrRating),
}

/// Bounded result cache that evicts the oldest entry first.
///
/// Entries are keyed by [`Chart::fingerprint`], a 64-bit hash that only
/// holds within the running process, so the cache lives and dies with its
/// session. Two different charts colliding on the hash would share an
/// entry; at 64 bits this is not expected within a session's capacity.
#[derive(Debug)]
struct RatingCache {
    capacity: usize,
    entries: HashMap<CacheKey, CachedRating>,
    order: VecDeque<CacheKey>,
}

impl RatingCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn get(&self, key: &CacheKey) -> Option<&CachedRating> {
        let cached = self.entries.get(key);

        if cached.is_some() {
            tracing::debug!(?key, "cache hit");
        }

        cached
    }

    fn insert(&mut self, key: CacheKey, rating: CachedRating) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.insert(key, rating).is_some() {
            return;
        }

        self.order.push_back(key);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(rows: usize) -> Vec<NoteEvent> {
        (0..rows)
            .map(|i| NoteEvent::tap(i as f64 * 0.1, (i % 4) as u32))
            .collect()
    }

    #[test]
    fn closed_session_rejects_queries() {
        let chart = Chart::new(&notes(32)).unwrap();
        let mut calc = Calc::new();

        assert!(calc.rate_all(&chart).is_ok());

        calc.close();
        calc.close();

        assert!(!calc.is_open());
        assert_eq!(calc.rate_all(&chart), Err(RatingError::HandleMisuse));
        assert_eq!(
            calc.rate_at(&chart, 1.0, 93.0),
            Err(RatingError::HandleMisuse)
        );
        assert_eq!(calc.calc_msd(&[]), Err(RatingError::HandleMisuse));
        assert!(matches!(
            calc.inspect(&chart, 1.0),
            Err(RatingError::HandleMisuse)
        ));
    }

    #[test]
    fn cached_results_match() {
        let chart = Chart::new(&notes(48)).unwrap();
        let mut calc = Calc::new();

        let first = calc.rate_all(&chart).unwrap();
        assert_eq!(calc.cache.as_ref().map(RatingCache::len), Some(1));

        let second = calc.rate_all(&chart).unwrap();
        assert_eq!(first, second);

        let ssr = calc.rate_at(&chart, 1.1, 93.0).unwrap();
        assert_eq!(calc.rate_at(&chart, 1.1, 93.0).unwrap(), ssr);
        assert_eq!(calc.cache.as_ref().map(RatingCache::len), Some(2));
    }

    #[test]
    fn similar_charts_are_cached_separately() {
        let short = Chart::new(&notes(48)).unwrap();
        let long = Chart::new(&notes(49)).unwrap();
        let mut calc = Calc::new();

        let short_msd = calc.rate_all(&short).unwrap();
        let long_msd = calc.rate_all(&long).unwrap();

        assert_ne!(short.fingerprint(), long.fingerprint());
        assert_eq!(calc.cache.as_ref().map(RatingCache::len), Some(2));
        assert_eq!(short_msd, difficulty::rate_all(&short, &calc.config).unwrap());
        assert_eq!(long_msd, difficulty::rate_all(&long, &calc.config).unwrap());
    }

    #[test]
    fn cache_evicts_oldest() {
        let mut cache = RatingCache::new(2);
        let rating = CachedRating::All(MsdForAllRates::default());

        for fingerprint in 0..3 {
            cache.insert(CacheKey::All { fingerprint }, rating);
        }

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&CacheKey::All { fingerprint: 0 }).is_none());
        assert!(cache.get(&CacheKey::All { fingerprint: 2 }).is_some());
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let chart = Chart::new(&notes(32)).unwrap();
        let mut calc = Calc::with_config(CalcConfig::new().cache_capacity(0));

        calc.rate_all(&chart).unwrap();

        assert_eq!(calc.cache.as_ref().map(RatingCache::len), Some(0));
    }

    #[test]
    fn invalid_input_is_not_cached() {
        let chart = Chart::new(&notes(32)).unwrap();
        let mut calc = Calc::new();

        assert_eq!(
            calc.rate_at(&chart, -1.0, 93.0),
            Err(RatingError::InvalidRate(-1.0))
        );
        assert!(calc.calc_msd(&[]).is_err());
        assert_eq!(calc.cache.as_ref().map(RatingCache::len), Some(0));
    }
}
