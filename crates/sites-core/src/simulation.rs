//! Simulation
//!
//! Owns the lattice together with the resolved engine parameters and the
//! renderer-facing metadata. The selection cursor is stored here for the UI
//! and never read by the engine.

use rand::Rng;
use sites_events::DimensionRole;

use crate::components::{DimensionInfo, Lattice, Site, TraitVector};
use crate::systems::{try_event, EngineParams, Tick};

pub struct Simulation {
    lattice: Lattice,
    params: EngineParams,
    dimension_info: Vec<DimensionInfo>,
    selection: Option<Site>,
}

impl Simulation {
    /// Wraps a lattice, describing its dimensions from the resolved roles.
    pub fn new(lattice: Lattice, params: EngineParams) -> Self {
        let dimension_info = (0..lattice.dimensions())
            .map(|i| {
                let role = if params.conformity.map(|m| m.index) == Some(i) {
                    Some(DimensionRole::Conformity)
                } else if params.conviction.map(|m| m.index) == Some(i) {
                    Some(DimensionRole::Conviction)
                } else {
                    None
                };
                DimensionInfo::new(i, role)
            })
            .collect();
        Self {
            lattice,
            params,
            dimension_info,
            selection: None,
        }
    }

    /// Attaches display names to dimensions, in index order.
    pub fn with_labels(mut self, labels: &[String]) -> Self {
        for (info, label) in self.dimension_info.iter_mut().zip(labels) {
            info.name = Some(label.clone());
        }
        self
    }

    /// Runs one engine tick.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Tick {
        try_event(&mut self.lattice, &self.params, rng)
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn width(&self) -> usize {
        self.lattice.width()
    }

    pub fn height(&self) -> usize {
        self.lattice.height()
    }

    pub fn dimensions(&self) -> usize {
        self.lattice.dimensions()
    }

    pub fn trait_at(&self, x: usize, y: usize) -> Option<&TraitVector> {
        self.lattice.trait_at(x, y)
    }

    pub fn dimension_info(&self) -> &[DimensionInfo] {
        &self.dimension_info
    }

    /// Dimension carrying `role`, if the role is active.
    pub fn role_index(&self, role: DimensionRole) -> Option<usize> {
        match role {
            DimensionRole::Conformity => self.params.conformity.map(|m| m.index),
            DimensionRole::Conviction => self.params.conviction.map(|m| m.index),
        }
    }

    pub fn selection(&self) -> Option<Site> {
        self.selection
    }

    /// Sets the selection cursor. Out-of-bounds sites are ignored.
    pub fn set_selection(&mut self, site: Option<Site>) -> bool {
        match site {
            Some(site) if !self.lattice.contains(site) => false,
            _ => {
                self.selection = site;
                true
            }
        }
    }

    /// Selects `site`, or clears the selection if it is already selected.
    pub fn toggle_selection(&mut self, site: Site) {
        if !self.lattice.contains(site) {
            return;
        }
        self.selection = if self.selection == Some(site) {
            None
        } else {
            Some(site)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Modulator, Shape};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample() -> Simulation {
        let lattice = Lattice::filled(3, 2, 4, 0.5).unwrap();
        let params = EngineParams {
            conformity: Some(Modulator::new(0, Shape::PeakAtOne)),
            conviction: Some(Modulator::new(2, Shape::Linear)),
            ..EngineParams::default()
        };
        Simulation::new(lattice, params)
    }

    #[test]
    fn test_accessors() {
        let sim = sample();
        assert_eq!(sim.width(), 3);
        assert_eq!(sim.height(), 2);
        assert_eq!(sim.dimensions(), 4);
        assert_eq!(sim.trait_at(2, 1).unwrap().len(), 4);
        assert!(sim.trait_at(3, 1).is_none());
    }

    #[test]
    fn test_dimension_info_reflects_roles() {
        let sim = sample().with_labels(&["conform".to_string(), "food".to_string()]);
        let info = sim.dimension_info();
        assert_eq!(info.len(), 4);
        assert_eq!(info[0].role, Some(DimensionRole::Conformity));
        assert_eq!(info[2].role, Some(DimensionRole::Conviction));
        assert_eq!(info[1].role, None);
        assert_eq!(info[1].name.as_deref(), Some("food"));
        assert_eq!(info[3].name, None);
        assert_eq!(sim.role_index(DimensionRole::Conviction), Some(2));
    }

    #[test]
    fn test_selection_toggle() {
        let mut sim = sample();
        sim.toggle_selection(Site::new(1, 1));
        assert_eq!(sim.selection(), Some(Site::new(1, 1)));
        sim.toggle_selection(Site::new(0, 1));
        assert_eq!(sim.selection(), Some(Site::new(0, 1)));
        sim.toggle_selection(Site::new(0, 1));
        assert_eq!(sim.selection(), None);
        sim.toggle_selection(Site::new(9, 9));
        assert_eq!(sim.selection(), None);
    }

    #[test]
    fn test_set_selection_rejects_out_of_bounds() {
        let mut sim = sample();
        assert!(!sim.set_selection(Some(Site::new(3, 0))));
        assert!(sim.set_selection(Some(Site::new(2, 0))));
        assert!(sim.set_selection(None));
        assert_eq!(sim.selection(), None);
    }

    #[test]
    fn test_selection_does_not_affect_engine() {
        let mut plain = sample();
        let mut selected = sample();
        selected.toggle_selection(Site::new(0, 0));

        let mut rng1 = SmallRng::seed_from_u64(3);
        let mut rng2 = SmallRng::seed_from_u64(3);
        for _ in 0..500 {
            plain.step(&mut rng1);
            selected.step(&mut rng2);
        }
        assert_eq!(plain.lattice(), selected.lattice());
    }
}
