//! Patrol / Chase / Attack классификация (pure)

use bevy::prelude::*;
use crate::adversary::AdversaryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AdversaryMode {
    Patrol,
    Chase,
    Attack,
}

/// Attack если оба предиката, Chase если только sight, иначе Patrol
pub fn classify(in_sight: bool, in_attack_range: bool) -> AdversaryMode {
    match (in_sight, in_attack_range) {
        (true, true) => AdversaryMode::Attack,
        (true, false) => AdversaryMode::Chase,
        _ => AdversaryMode::Patrol,
    }
}

/// (sight, attack) радиусы с учётом hysteresis margin
///
/// margin = 0 → радиусы из конфига как есть (flicker на границе возможен).
/// margin > 0 → радиус "текущего" режима расширяется, чтобы выход из него
/// требовал отойти дальше, чем вход.
pub fn effective_radii(config: &AdversaryConfig, previous: Option<AdversaryMode>) -> (f32, f32) {
    let margin = config.hysteresis_margin.max(0.0);

    let sight = match previous {
        Some(AdversaryMode::Chase) | Some(AdversaryMode::Attack) => config.sight_radius + margin,
        _ => config.sight_radius,
    };

    let attack = match previous {
        Some(AdversaryMode::Attack) => config.attack_radius + margin,
        _ => config.attack_radius,
    };

    (sight, attack)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        assert_eq!(classify(false, false), AdversaryMode::Patrol);
        assert_eq!(classify(true, false), AdversaryMode::Chase);
        assert_eq!(classify(true, true), AdversaryMode::Attack);
        // Attack radius без sight (attack > sight в конфиге) — всё равно Patrol
        assert_eq!(classify(false, true), AdversaryMode::Patrol);
    }

    #[test]
    fn test_no_hysteresis_by_default() {
        let config = AdversaryConfig::default();
        let (sight, attack) = effective_radii(&config, Some(AdversaryMode::Attack));
        assert_eq!(sight, config.sight_radius);
        assert_eq!(attack, config.attack_radius);
    }

    #[test]
    fn test_hysteresis_extends_current_mode() {
        let config = AdversaryConfig {
            hysteresis_margin: 0.5,
            ..default()
        };

        let (sight, attack) = effective_radii(&config, Some(AdversaryMode::Chase));
        assert_eq!(sight, config.sight_radius + 0.5);
        assert_eq!(attack, config.attack_radius);

        let (sight, attack) = effective_radii(&config, Some(AdversaryMode::Patrol));
        assert_eq!(sight, config.sight_radius);
        assert_eq!(attack, config.attack_radius);
    }
}
