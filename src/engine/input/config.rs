// Input configuration and remapping system

use super::action::{default_p1_bindings, default_p2_bindings, Action, InputSource};
use std::collections::HashMap;

/// Key bindings for a single player
#[derive(Debug, Clone)]
pub struct InputConfig {
    /// Player index this config is for
    player_id: usize,

    /// Mapping from keys to buttons
    bindings: HashMap<InputSource, Action>,

    /// Reverse mapping for quick lookups (button -> all keys)
    action_to_sources: HashMap<Action, Vec<InputSource>>,
}

impl InputConfig {
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            bindings: HashMap::new(),
            action_to_sources: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(player_id: usize, bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new(player_id);
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Default bindings for the given player index (players past the second
    /// have no local keys)
    pub fn defaults(player_id: usize) -> Self {
        let bindings = match player_id {
            0 => default_p1_bindings(),
            1 => default_p2_bindings(),
            _ => Vec::new(),
        };
        Self::from_bindings(player_id, bindings)
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Bind a key to a button, replacing whatever the key was bound to
    pub fn bind(&mut self, source: InputSource, action: Action) {
        self.unbind_source(&source);

        self.action_to_sources
            .entry(action)
            .or_default()
            .push(source.clone());
        self.bindings.insert(source, action);
    }

    /// Unbind a key
    pub fn unbind_source(&mut self, source: &InputSource) {
        if let Some(action) = self.bindings.remove(source) {
            if let Some(sources) = self.action_to_sources.get_mut(&action) {
                sources.retain(|s| s != source);
                if sources.is_empty() {
                    self.action_to_sources.remove(&action);
                }
            }
        }
    }

    /// Get the button bound to a key
    pub fn get_action(&self, source: &InputSource) -> Option<Action> {
        self.bindings.get(source).copied()
    }

    /// Get all keys bound to a button
    pub fn get_sources(&self, action: Action) -> &[InputSource] {
        self.action_to_sources
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if a button has any bindings
    pub fn has_binding(&self, action: Action) -> bool {
        self.action_to_sources.contains_key(&action)
    }

    /// Reset to default bindings for this player
    pub fn reset_to_defaults(&mut self) {
        *self = Self::defaults(self.player_id);
    }
}

/// Bindings for every local player
#[derive(Debug, Clone)]
pub struct InputConfigManager {
    configs: Vec<InputConfig>,
}

impl InputConfigManager {
    pub fn new(max_players: usize) -> Self {
        Self {
            configs: (0..max_players).map(InputConfig::defaults).collect(),
        }
    }

    pub fn get_config(&self, player_id: usize) -> Option<&InputConfig> {
        self.configs.get(player_id)
    }

    pub fn get_config_mut(&mut self, player_id: usize) -> Option<&mut InputConfig> {
        self.configs.get_mut(player_id)
    }

    /// Every (player, button) pair a key is bound to
    pub fn resolve(&self, source: &InputSource) -> Vec<(usize, Action)> {
        self.configs
            .iter()
            .filter_map(|config| {
                config
                    .get_action(source)
                    .map(|action| (config.player_id(), action))
            })
            .collect()
    }
}

impl Default for InputConfigManager {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_lookup() {
        let mut config = InputConfig::new(0);
        config.bind(InputSource::key("k"), Action::Melee);
        assert_eq!(config.get_action(&InputSource::key("k")), Some(Action::Melee));
        assert_eq!(config.get_sources(Action::Melee), &[InputSource::key("k")]);
    }

    #[test]
    fn test_rebind_moves_key() {
        let mut config = InputConfig::new(0);
        config.bind(InputSource::key("k"), Action::Melee);
        config.bind(InputSource::key("k"), Action::Special);

        assert_eq!(config.get_action(&InputSource::key("k")), Some(Action::Special));
        assert!(!config.has_binding(Action::Melee));
    }

    #[test]
    fn test_defaults_per_player() {
        let p1 = InputConfig::defaults(0);
        let p2 = InputConfig::defaults(1);
        assert_eq!(p1.get_action(&InputSource::key("p")), Some(Action::Melee));
        assert_eq!(p2.get_action(&InputSource::key("c")), Some(Action::Melee));
        assert_eq!(p1.get_action(&InputSource::key("c")), None);
        assert!(InputConfig::defaults(2).get_sources(Action::Melee).is_empty());
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut config = InputConfig::defaults(0);
        config.unbind_source(&InputSource::key("p"));
        assert!(!config.has_binding(Action::Melee));

        config.reset_to_defaults();
        assert!(config.has_binding(Action::Melee));
    }

    #[test]
    fn test_manager_resolves_to_owner() {
        let manager = InputConfigManager::default();
        assert_eq!(
            manager.resolve(&InputSource::key("ArrowLeft")),
            vec![(1, Action::MoveLeft)]
        );
        assert!(manager.resolve(&InputSource::key("q")).is_empty());
    }
}
