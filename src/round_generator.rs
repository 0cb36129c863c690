use crate::game::{Bounds, Marker, MarkerStatus, Position, MARKER_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;

/// Configuration for laying out one round.
#[derive(Debug, Clone, Copy)]
pub struct RoundConfig {
    pub marker_count: u32,
    pub bounds: Bounds,
}

/// Produces the round's display order and marker positions: a uniformly
/// shuffled permutation of 1..=N, each identifier given an independent
/// random offset inside the container. Markers may overlap; there is no
/// collision avoidance.
pub struct RoundGenerator {
    config: RoundConfig,
}

impl RoundGenerator {
    pub fn new(config: RoundConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> Vec<Marker> {
        let mut rng = rand::thread_rng();

        let mut ids: Vec<u32> = (1..=self.config.marker_count).collect();
        ids.shuffle(&mut rng);

        ids.into_iter()
            .map(|id| Marker {
                id,
                pos: Position {
                    x: sample_offset(&mut rng, self.config.bounds.width),
                    y: sample_offset(&mut rng, self.config.bounds.height),
                },
                status: MarkerStatus::Pending,
            })
            .collect()
    }
}

/// Uniform offset in [0, limit - MARKER_SIZE). A container smaller than the
/// marker footprint collapses the span to the single offset 0 instead of
/// inverting the range.
fn sample_offset<R: Rng>(rng: &mut R, limit: f64) -> f64 {
    let span = limit - MARKER_SIZE;
    if span <= 0.0 {
        0.0
    } else {
        rng.gen_range(0.0..span)
    }
}
