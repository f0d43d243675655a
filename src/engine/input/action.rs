// Logical button definitions and default key bindings

use serde::{Deserialize, Serialize};

/// Logical buttons a player can hold. Kits turn these into an intent;
/// nothing below the input layer knows which physical key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Movement
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,

    // Attacks
    Melee,
    Special,
    Ability,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Melee,
        Action::Special,
        Action::Ability,
    ];
}

/// A host key name (e.g. `"a"`, `"ArrowLeft"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputSource(String);

impl InputSource {
    /// Create an input source from a key name
    pub fn key(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Default bindings for Player 1: WASD to move, P melee, I special, O ability
pub fn default_p1_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key("w"), Action::MoveUp),
        (InputSource::key("s"), Action::MoveDown),
        (InputSource::key("a"), Action::MoveLeft),
        (InputSource::key("d"), Action::MoveRight),
        (InputSource::key("p"), Action::Melee),
        (InputSource::key("i"), Action::Special),
        (InputSource::key("o"), Action::Ability),
    ]
}

/// Default bindings for Player 2: arrows to move, C melee, Z special, X ability
pub fn default_p2_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key("ArrowUp"), Action::MoveUp),
        (InputSource::key("ArrowDown"), Action::MoveDown),
        (InputSource::key("ArrowLeft"), Action::MoveLeft),
        (InputSource::key("ArrowRight"), Action::MoveRight),
        (InputSource::key("c"), Action::Melee),
        (InputSource::key("z"), Action::Special),
        (InputSource::key("x"), Action::Ability),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_action_bound_for_both_players() {
        for bindings in [default_p1_bindings(), default_p2_bindings()] {
            let bound: HashSet<Action> = bindings.iter().map(|(_, a)| *a).collect();
            for action in Action::ALL {
                assert!(bound.contains(&action), "{action:?} has no default key");
            }
        }
    }

    #[test]
    fn test_player_key_sets_are_disjoint() {
        let p1: HashSet<InputSource> = default_p1_bindings().into_iter().map(|(s, _)| s).collect();
        let p2: HashSet<InputSource> = default_p2_bindings().into_iter().map(|(s, _)| s).collect();
        assert!(p1.is_disjoint(&p2));
    }

    #[test]
    fn test_no_duplicate_inputs_in_p1() {
        let bindings = default_p1_bindings();
        let mut seen_sources = HashSet::new();
        for (source, _) in bindings {
            assert!(
                seen_sources.insert(source),
                "Duplicate input source found in P1 bindings"
            );
        }
    }

    #[test]
    fn test_source_name() {
        assert_eq!(InputSource::key("ArrowLeft").name(), "ArrowLeft");
    }
}
