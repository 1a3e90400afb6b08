use strum::Display;

use crate::grid::{closest, manhattan, within_one_step, Direction, GridState};

use super::{FeatureExtractor, FeatureVector};

/// Feature names emitted by the grid-world extractors
#[derive(Display, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[strum(serialize_all = "kebab-case")]
pub enum PacmanFeature {
    Bias,
    #[strum(serialize = "#-of-hazards-1-step-away")]
    HazardsOneStepAway,
    EatsFood,
    ClosestFood,
    FoodDensity,
    ChaseScaredHazard,
    HazardTooClose,
    HazardNearby,
    HazardAdjacent,
    EatsCapsule,
    ClosestCapsule,
    LegalAction,
    DeadEndRisk,
}

use PacmanFeature::*;

/// A small, general feature set for grid worlds with food and hazards
///
/// Every feature describes the cell the agent would occupy after taking the action:
/// - `bias`: always `1`
/// - `#-of-hazards-1-step-away`: hazards that could reach the cell in one move
/// - `eats-food`: the cell holds food and no hazard is one step away
/// - `closest-food`: BFS distance to the nearest food, divided by the grid area; absent
///   when no food is reachable
///
/// All values are then divided by `10` to keep updates stable.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleExtractor;

impl<S: GridState> FeatureExtractor<S, Direction> for SimpleExtractor {
    type Feature = PacmanFeature;

    fn features(&self, state: &S, action: &Direction) -> FeatureVector<PacmanFeature> {
        let walls = state.walls();
        let food = state.food();
        let next = action.apply(state.agent_position());

        let mut features = FeatureVector::new();
        features.set(Bias, 1.0);

        let hazards = state
            .hazards()
            .iter()
            .filter(|h| within_one_step(next, h.position, walls))
            .count();
        features.set(HazardsOneStepAway, hazards as f64);

        if hazards == 0 && food.get(next) {
            features.set(EatsFood, 1.0);
        }

        if let Some(dist) = closest(next, walls, |p| food.get(p)) {
            features.set(ClosestFood, dist as f64 / walls.area() as f64);
        }

        features.divide_all(10.0);
        features
    }
}

/// Magnitudes and radii of the [`AdvancedExtractor`] heuristics
///
/// These are hand-tuned defaults, not derived from any optimality criterion.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvancedConfig {
    pub eats_food: f64,
    /// Scale of the normalized distance to the nearest food (negative: closer is better)
    pub closest_food: f64,
    pub food_density: f64,
    /// Half-width of the square window counted for food density
    pub density_radius: i32,
    pub chase_scared: f64,
    /// Weakened hazards closer than this are pursued
    pub chase_radius: u32,
    pub too_close: f64,
    pub too_close_radius: u32,
    /// Added to the distance before inverting, so a hazard on the cell stays finite
    pub too_close_smoothing: f64,
    pub nearby: f64,
    pub nearby_radius: u32,
    /// Per hazard within one step
    pub adjacent: f64,
    pub eats_capsule: f64,
    pub closest_capsule: f64,
    /// Capsules are only sought when an active hazard is closer than this
    pub capsule_threat_radius: u32,
    pub legal_action: f64,
    pub dead_end_risk: f64,
    /// States with at most this many legal actions count as dead ends
    pub dead_end_actions: usize,
    pub bias: f64,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            eats_food: 10.0,
            closest_food: -0.5,
            food_density: 2.0,
            density_radius: 2,
            chase_scared: 2.0,
            chase_radius: 3,
            too_close: -5.0,
            too_close_radius: 2,
            too_close_smoothing: 0.1,
            nearby: -1.0,
            nearby_radius: 5,
            adjacent: -8.0,
            eats_capsule: 5.0,
            closest_capsule: -0.3,
            capsule_threat_radius: 4,
            legal_action: 0.1,
            dead_end_risk: -0.5,
            dead_end_actions: 2,
            bias: 0.1,
        }
    }
}

/// Richer grid-world features: food pursuit, hazard avoidance, pursuit of weakened hazards,
/// capsule use under threat and dead-end avoidance
#[derive(Clone, Debug, Default)]
pub struct AdvancedExtractor {
    config: AdvancedConfig,
}

impl AdvancedExtractor {
    pub fn new(config: AdvancedConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdvancedConfig {
        &self.config
    }
}

impl<S: GridState> FeatureExtractor<S, Direction> for AdvancedExtractor {
    type Feature = PacmanFeature;

    fn features(&self, state: &S, action: &Direction) -> FeatureVector<PacmanFeature> {
        let cfg = &self.config;
        let walls = state.walls();
        let food = state.food();
        let capsules = state.capsules();
        let area = walls.area() as f64;
        let next = action.apply(state.agent_position());

        let mut features = FeatureVector::new();

        if food.get(next) {
            features.set(EatsFood, cfg.eats_food);
        }
        if let Some(dist) = closest(next, walls, |p| food.get(p)) {
            features.set(ClosestFood, cfg.closest_food * dist as f64 / area);
        }

        let r = cfg.density_radius;
        let window = (-r..=r)
            .flat_map(|dx| (-r..=r).map(move |dy| (next.0 + dx, next.1 + dy)))
            .filter(|&p| food.contains(p));
        let (total, eaten) = window.fold((0usize, 0usize), |(t, f), p| {
            (t + 1, f + usize::from(food.get(p)))
        });
        if total > 0 {
            features.set(FoodDensity, cfg.food_density * eaten as f64 / total as f64);
        }

        let mut nearest_active = None::<u32>;
        let mut chase = None::<f64>;
        for hazard in state.hazards() {
            let dist = manhattan(next, hazard.position);
            if !hazard.is_scared() {
                nearest_active = Some(nearest_active.map_or(dist, |d| d.min(dist)));
            } else if dist < cfg.chase_radius {
                let value = cfg.chase_scared / (dist as f64 + 1.0);
                chase = Some(chase.map_or(value, |c: f64| c.max(value)));
            }
        }
        if let Some(value) = chase {
            features.set(ChaseScaredHazard, value);
        }
        match nearest_active {
            Some(d) if d <= cfg.too_close_radius => {
                features.set(HazardTooClose, cfg.too_close / (d as f64 + cfg.too_close_smoothing));
            }
            Some(d) if d <= cfg.nearby_radius => {
                features.set(HazardNearby, cfg.nearby / d as f64);
            }
            _ => {}
        }

        let adjacent = state
            .hazards()
            .iter()
            .filter(|h| within_one_step(next, h.position, walls))
            .count();
        if adjacent > 0 {
            features.set(HazardAdjacent, cfg.adjacent * adjacent as f64);
        }

        if capsules.contains(&next) {
            features.set(EatsCapsule, cfg.eats_capsule);
        }
        let threatened = nearest_active.is_some_and(|d| d < cfg.capsule_threat_radius);
        if threatened {
            if let Some(dist) = closest(next, walls, |p| capsules.contains(&p)) {
                features.set(ClosestCapsule, cfg.closest_capsule * dist as f64 / area);
            }
        }

        let legal = state.legal_actions();
        if legal.contains(action) {
            features.set(LegalAction, cfg.legal_action);
        }
        if legal.len() <= cfg.dead_end_actions {
            features.set(DeadEndRisk, cfg.dead_end_risk);
        }

        features.set(Bias, cfg.bias);
        features
    }
}
