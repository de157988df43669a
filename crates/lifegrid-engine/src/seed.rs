//! Initial board contents.
//!
//! Applies the `seed` section of the config to a freshly created grid:
//! nothing, a seeded random fill, or one named pattern placed at the
//! configured offset (centered when no offset is given).

use lifegrid_core::config::{SeedConfig, SeedPattern};
use lifegrid_world::{Grid, WorldError};
use tracing::info;

/// Seed `grid` according to `config`. Returns the number of live cells.
///
/// # Errors
///
/// Returns [`WorldError::InvalidDensity`] for a random fill with a density
/// outside `[0, 1]`, or [`WorldError::OutOfBounds`] if a named pattern does
/// not fit at its offset.
pub fn seed_grid(grid: &mut Grid, config: &SeedConfig) -> Result<usize, WorldError> {
    match config.pattern {
        SeedPattern::Empty => {
            info!("Seeding empty grid");
        }
        SeedPattern::Random => {
            let alive = lifegrid_world::randomize(grid, config.density, config.rng_seed)?;
            info!(
                density = config.density,
                rng_seed = config.rng_seed,
                alive,
                "Seeded random grid"
            );
        }
        named => {
            if let Some(pattern) = named.pattern() {
                let (pattern_width, pattern_height) = pattern.extent();
                let x = config
                    .offset_x
                    .unwrap_or_else(|| centered(grid.width(), pattern_width));
                let y = config
                    .offset_y
                    .unwrap_or_else(|| centered(grid.height(), pattern_height));
                lifegrid_world::place(grid, pattern, x, y)?;
                info!(?pattern, x, y, "Placed seed pattern");
            }
        }
    }
    Ok(grid.alive_count())
}

/// Offset that centers a span of `inner` cells inside `outer` cells.
///
/// Returns 0 when the span does not fit; placement then reports the
/// overflow.
const fn centered(outer: usize, inner: usize) -> usize {
    outer.saturating_sub(inner) / 2
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifegrid_types::Position;

    use super::*;

    fn seed(pattern: SeedPattern) -> SeedConfig {
        SeedConfig {
            pattern,
            ..SeedConfig::default()
        }
    }

    #[test]
    fn empty_seed_leaves_grid_dead() {
        let mut grid = Grid::new(10, 10).unwrap();
        assert_eq!(seed_grid(&mut grid, &seed(SeedPattern::Empty)).unwrap(), 0);
    }

    #[test]
    fn random_seed_is_reproducible() {
        let mut a = Grid::new(20, 20).unwrap();
        let mut b = Grid::new(20, 20).unwrap();
        let config = seed(SeedPattern::Random);
        let alive = seed_grid(&mut a, &config).unwrap();
        seed_grid(&mut b, &config).unwrap();
        assert!(alive > 0);
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn named_pattern_is_centered_by_default() {
        let mut grid = Grid::new(7, 7).unwrap();
        let alive = seed_grid(&mut grid, &seed(SeedPattern::Block)).unwrap();
        assert_eq!(alive, 4);
        assert_eq!(
            grid.snapshot().alive_positions(),
            vec![
                Position::new(2, 2),
                Position::new(3, 2),
                Position::new(2, 3),
                Position::new(3, 3),
            ]
        );
    }

    #[test]
    fn explicit_offset_is_used() {
        let mut grid = Grid::new(7, 7).unwrap();
        let config = SeedConfig {
            pattern: SeedPattern::Block,
            offset_x: Some(0),
            offset_y: Some(5),
            ..SeedConfig::default()
        };
        seed_grid(&mut grid, &config).unwrap();
        assert!(grid.is_alive(0, 5).unwrap());
        assert!(grid.is_alive(1, 6).unwrap());
    }

    #[test]
    fn pattern_too_large_is_rejected() {
        let mut grid = Grid::new(2, 2).unwrap();
        let result = seed_grid(&mut grid, &seed(SeedPattern::Glider));
        assert!(matches!(result, Err(WorldError::OutOfBounds { .. })));
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn bad_density_is_rejected() {
        let mut grid = Grid::new(4, 4).unwrap();
        let config = SeedConfig {
            density: 1.5,
            ..SeedConfig::default()
        };
        assert!(matches!(
            seed_grid(&mut grid, &config),
            Err(WorldError::InvalidDensity(_))
        ));
    }
}
