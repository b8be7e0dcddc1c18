//! Weighted random draws used by system generation.
//!
//! Each draw is a small function over `&mut impl Rng` so generation stays
//! reproducible under a seeded RNG. The shaping rules that do not need
//! randomness (moon plan adjustment, planet count contribution) are split
//! out as pure functions.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Star count distribution: (count, weight in percent).
pub const STAR_COUNT_WEIGHTS: [(u32, f64); 5] = [
    (1, 59.62),
    (2, 31.52),
    (3, 6.25),
    (4, 1.88),
    (5, 0.44),
];

/// Inclusive star temperature range (spectral class proxy, M through O).
pub const STAR_TEMPERATURE_RANGE: (u8, u8) = (1, 7);

/// Inclusive area range of a randomly generated terrestrial planet.
pub const TERRESTRIAL_AREA_RANGE: (u32, u32) = (3, 6);

/// Size bound used when generating moons around a gas giant.
pub const GAS_GIANT_MOON_BOUND: u32 = 8;

/// Draw the number of stars in a system.
pub fn draw_star_count(rng: &mut impl Rng) -> u32 {
    let weights = STAR_COUNT_WEIGHTS.iter().map(|(_, w)| *w);
    match WeightedIndex::new(weights) {
        Ok(dist) => STAR_COUNT_WEIGHTS[dist.sample(rng)].0,
        Err(_) => 1,
    }
}

/// Draw a star temperature uniformly from 1..=7.
pub fn draw_star_temperature(rng: &mut impl Rng) -> u8 {
    rng.gen_range(STAR_TEMPERATURE_RANGE.0..=STAR_TEMPERATURE_RANGE.1)
}

/// Planets contributed by the `star_index`-th star (1-based) for a raw
/// draw in 4..=10. Later stars contribute less.
pub fn planet_contribution(raw: u32, star_index: u32) -> u32 {
    raw / (2 * star_index.max(1))
}

/// Draw the candidate planet count for a system with `star_count` stars.
pub fn draw_planet_count(star_count: u32, rng: &mut impl Rng) -> u32 {
    (1..=star_count)
        .map(|i| planet_contribution(rng.gen_range(4..=10), i))
        .sum()
}

/// Draw the area of a terrestrial planet.
pub fn draw_terrestrial_area(rng: &mut impl Rng) -> u32 {
    rng.gen_range(TERRESTRIAL_AREA_RANGE.0..=TERRESTRIAL_AREA_RANGE.1)
}

/// How many moons to generate around a planet and how large they may get.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoonPlan {
    /// Number of moons to create.
    pub count: u32,
    /// Exclusive upper bound on each moon's area.
    pub bound: u32,
}

/// Raw moon count from a uniform sample `u` in `[0, 1)`: `floor(e^(3u - 1))`.
pub fn raw_moon_count(u: f64) -> u32 {
    (3.0 * u - 1.0).exp().floor() as u32
}

/// Shape a raw moon count against the planet's size.
///
/// Small planets (size < 8) lose two moons when the draw is above 4. Large
/// planets (size > 5) gain a moon but have their size halved for bounding
/// moon area. The generated count is one more than the adjusted draw.
pub fn adjust_moon_plan(raw: u32, size: u32) -> MoonPlan {
    let mut count = raw;
    let mut bound = size;
    if bound < 8 && count > 4 {
        count -= 2;
    }
    if bound > 5 {
        count += 1;
        bound /= 2;
    }
    MoonPlan {
        count: count + 1,
        bound,
    }
}

/// Draw a moon plan for a planet of the given size.
pub fn draw_moon_plan(size: u32, rng: &mut impl Rng) -> MoonPlan {
    let u: f64 = rng.gen();
    adjust_moon_plan(raw_moon_count(u), size)
}

/// Draw a moon's area in `1..bound`.
///
/// Returns `None` when `bound < 2`, since no area of at least 1 fits below it.
pub fn draw_moon_area(bound: u32, rng: &mut impl Rng) -> Option<u32> {
    (bound >= 2).then(|| rng.gen_range(1..bound))
}
