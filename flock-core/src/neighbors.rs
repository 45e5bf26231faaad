//! Neighbor discovery.
//!
//! Every consumer goes through [`NeighborQuery`]: given the agent slice, the
//! index of the acting agent and a radius, yield the other agents strictly
//! inside that radius, in slice order. [`BruteForce`] is the reference
//! implementation; [`UniformGrid`] buckets agents into cells and must return
//! exactly the same sequence.

use crate::boid::Boid;
use crate::params::WorldParams;

/// Source of neighbor sets for the world step
pub trait NeighborQuery {
    type Neighbors<'a>: Iterator<Item = &'a Boid> + Clone
    where
        Self: 'a;

    /// Called once per step with the pre-step snapshot, before any query.
    fn rebuild(&mut self, _agents: &[Boid], _params: &WorldParams) {}

    fn neighbors_of<'a>(
        &'a self,
        agents: &'a [Boid],
        index: usize,
        radius: f32,
    ) -> Self::Neighbors<'a>;
}

/// All-pairs scan, O(n) per query
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

/// Iterator over the agents within a radius of one agent
#[derive(Debug, Clone)]
pub struct Neighbors<'a> {
    agents: core::iter::Enumerate<core::slice::Iter<'a, Boid>>,
    origin: Option<&'a Boid>,
    index: usize,
    radius_sq: f32,
}

impl<'a> Iterator for Neighbors<'a> {
    type Item = &'a Boid;

    fn next(&mut self) -> Option<Self::Item> {
        let origin = self.origin?;
        for (i, other) in self.agents.by_ref() {
            if i == self.index {
                continue;
            }
            if origin.position.distance_squared(&other.position) < self.radius_sq {
                return Some(other);
            }
        }
        None
    }
}

/// Every agent other than `agents[index]` closer than `radius`, in slice
/// order. An out-of-range index has no neighbors.
pub fn neighbors_of(agents: &[Boid], index: usize, radius: f32) -> Neighbors<'_> {
    Neighbors {
        agents: agents.iter().enumerate(),
        origin: agents.get(index),
        index,
        radius_sq: radius * radius,
    }
}

impl NeighborQuery for BruteForce {
    type Neighbors<'a> = Neighbors<'a>;

    fn neighbors_of<'a>(
        &'a self,
        agents: &'a [Boid],
        index: usize,
        radius: f32,
    ) -> Self::Neighbors<'a> {
        neighbors_of(agents, index, radius)
    }
}

#[cfg(feature = "std")]
pub use grid::{GridNeighbors, UniformGrid};

#[cfg(feature = "std")]
mod grid {
    use super::NeighborQuery;
    use crate::boid::Boid;
    use crate::params::WorldParams;

    const MIN_CELL_SIZE: f32 = 1.0e-3;
    const MAX_CELLS_PER_AXIS: usize = 256;

    /// Uniform bucket grid over the world bounds, rebuilt every step.
    ///
    /// Cells are at least as large as the widest behavior radius, so most
    /// queries touch a 3x3 block. Positions outside the bounds are clamped
    /// into the border cells, which keeps the candidate set a superset of
    /// the true neighbors.
    #[derive(Debug, Clone, Default)]
    pub struct UniformGrid {
        cell_size: f32,
        cols: usize,
        rows: usize,
        cells: Vec<Vec<usize>>,
    }

    impl UniformGrid {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn cell_count(&self) -> usize {
            self.cells.len()
        }

        #[inline]
        fn cell_coord(&self, value: f32, cells: usize) -> usize {
            let cell = (value / self.cell_size).floor();
            if cell <= 0.0 || cell.is_nan() {
                0
            } else {
                (cell as usize).min(cells - 1)
            }
        }

        fn candidates(&self, origin: &Boid, radius: f32) -> Vec<usize> {
            if self.cells.is_empty() {
                return Vec::new();
            }
            let radius = radius.max(0.0);
            let min_x = self.cell_coord(origin.position.x - radius, self.cols);
            let max_x = self.cell_coord(origin.position.x + radius, self.cols);
            let min_y = self.cell_coord(origin.position.y - radius, self.rows);
            let max_y = self.cell_coord(origin.position.y + radius, self.rows);

            let mut result = Vec::new();
            for row in min_y..=max_y {
                for col in min_x..=max_x {
                    result.extend_from_slice(&self.cells[row * self.cols + col]);
                }
            }
            // Restore slice order; cell order is spatial.
            result.sort_unstable();
            result
        }
    }

    fn axis_cells(extent: f32, cell_size: f32) -> usize {
        ((extent / cell_size).ceil() as usize).clamp(1, MAX_CELLS_PER_AXIS)
    }

    /// Grid candidates filtered down to the exact neighbor set
    #[derive(Debug, Clone)]
    pub struct GridNeighbors<'a> {
        agents: &'a [Boid],
        candidates: std::vec::IntoIter<usize>,
        index: usize,
        radius_sq: f32,
    }

    impl<'a> Iterator for GridNeighbors<'a> {
        type Item = &'a Boid;

        fn next(&mut self) -> Option<Self::Item> {
            let origin = self.agents.get(self.index)?;
            for i in self.candidates.by_ref() {
                if i == self.index {
                    continue;
                }
                let Some(other) = self.agents.get(i) else {
                    continue;
                };
                if origin.position.distance_squared(&other.position) < self.radius_sq {
                    return Some(other);
                }
            }
            None
        }
    }

    impl NeighborQuery for UniformGrid {
        type Neighbors<'a> = GridNeighbors<'a>;

        fn rebuild(&mut self, agents: &[Boid], params: &WorldParams) {
            // Small radii coarsen the grid rather than grow it without bound.
            let per_axis = MAX_CELLS_PER_AXIS as f32;
            self.cell_size = params
                .vision_radius
                .max(params.avoid_radius)
                .max(params.width / per_axis)
                .max(params.height / per_axis)
                .max(MIN_CELL_SIZE);
            self.cols = axis_cells(params.width, self.cell_size);
            self.rows = axis_cells(params.height, self.cell_size);

            let cell_count = self.cols * self.rows;
            if self.cells.len() != cell_count {
                self.cells = vec![Vec::new(); cell_count];
            } else {
                for cell in &mut self.cells {
                    cell.clear();
                }
            }

            for (i, boid) in agents.iter().enumerate() {
                let col = self.cell_coord(boid.position.x, self.cols);
                let row = self.cell_coord(boid.position.y, self.rows);
                self.cells[row * self.cols + col].push(i);
            }
        }

        fn neighbors_of<'a>(
            &'a self,
            agents: &'a [Boid],
            index: usize,
            radius: f32,
        ) -> Self::Neighbors<'a> {
            let candidates = match agents.get(index) {
                Some(origin) => self.candidates(origin, radius),
                None => Vec::new(),
            };
            GridNeighbors {
                agents,
                candidates: candidates.into_iter(),
                index,
                radius_sq: radius * radius,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector2D;

    fn at(x: f32, y: f32) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::zero())
    }

    #[test]
    fn test_excludes_self_and_far_agents() {
        let agents = [at(0.0, 0.0), at(3.0, 0.0), at(20.0, 0.0)];

        let found: heapless::Vec<&Boid, 4> = neighbors_of(&agents, 0, 5.0).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Vector2D::new(3.0, 0.0));
    }

    #[test]
    fn test_radius_is_strict() {
        let agents = [at(0.0, 0.0), at(5.0, 0.0)];
        assert_eq!(neighbors_of(&agents, 0, 5.0).count(), 0);
        assert_eq!(neighbors_of(&agents, 0, 5.001).count(), 1);
    }

    #[test]
    fn test_slice_order_not_distance_order() {
        let agents = [at(0.0, 0.0), at(4.0, 0.0), at(1.0, 0.0), at(2.0, 0.0)];

        let xs: heapless::Vec<f32, 4> = neighbors_of(&agents, 0, 10.0)
            .map(|b| b.position.x)
            .collect();

        assert_eq!(xs.as_slice(), &[4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_coincident_agents_are_neighbors() {
        let agents = [at(1.0, 1.0), at(1.0, 1.0)];
        assert_eq!(neighbors_of(&agents, 1, 0.5).count(), 1);
    }

    #[test]
    fn test_out_of_range_index() {
        let agents = [at(0.0, 0.0)];
        assert_eq!(neighbors_of(&agents, 7, 100.0).count(), 0);
        assert_eq!(neighbors_of(&[] as &[Boid], 0, 100.0).count(), 0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_grid_matches_brute_force() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let params = WorldParams::with_bounds(300.0, 200.0);
        let agents: Vec<Boid> = (0..250)
            .map(|_| at(rng.gen_range(0.0..300.0), rng.gen_range(0.0..200.0)))
            .collect();

        let mut grid = UniformGrid::new();
        grid.rebuild(&agents, &params);
        assert!(grid.cell_count() > 1);

        for radius in [params.avoid_radius, params.vision_radius, 75.0] {
            for index in 0..agents.len() {
                let expected: Vec<*const Boid> = BruteForce
                    .neighbors_of(&agents, index, radius)
                    .map(|b| b as *const Boid)
                    .collect();
                let actual: Vec<*const Boid> = grid
                    .neighbors_of(&agents, index, radius)
                    .map(|b| b as *const Boid)
                    .collect();
                assert_eq!(actual, expected, "agent {} radius {}", index, radius);
            }
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_grid_with_zero_radii_stays_bounded() {
        let mut params = WorldParams::with_bounds(800.0, 600.0);
        params.vision_radius = 0.0;
        params.avoid_radius = 0.0;
        assert!(params.validate().is_ok());

        let agents = vec![at(10.0, 10.0), at(12.0, 10.0), at(400.0, 300.0)];
        let mut grid = UniformGrid::new();
        grid.rebuild(&agents, &params);

        assert!(grid.cell_count() <= 256 * 256);
        for index in 0..agents.len() {
            assert_eq!(
                grid.neighbors_of(&agents, index, 5.0).count(),
                BruteForce.neighbors_of(&agents, index, 5.0).count()
            );
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_grid_handles_positions_outside_bounds() {
        let params = WorldParams::with_bounds(100.0, 100.0);
        let agents = vec![at(-3.0, 50.0), at(2.0, 50.0), at(140.0, 50.0), at(99.0, 50.0)];

        let mut grid = UniformGrid::new();
        grid.rebuild(&agents, &params);

        assert_eq!(grid.neighbors_of(&agents, 0, 10.0).count(), 1);
        assert_eq!(grid.neighbors_of(&agents, 3, 45.0).count(), 1);
        assert_eq!(grid.neighbors_of(&agents, 9, 10.0).count(), 0);
    }
}
