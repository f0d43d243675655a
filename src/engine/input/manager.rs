// Input manager - turns host key events into per-player button state

use super::action::{Action, InputSource};
use super::config::InputConfigManager;
use super::player::PlayerInput;
use log::trace;

/// Coordinates key bindings and button state for all local players
#[derive(Debug)]
pub struct InputManager {
    config: InputConfigManager,
    players: Vec<PlayerInput>,
}

impl InputManager {
    pub fn new(max_players: usize) -> Self {
        Self {
            config: InputConfigManager::new(max_players),
            players: (0..max_players).map(PlayerInput::new).collect(),
        }
    }

    /// A key went down on the host
    pub fn key_down(&mut self, key: &str) {
        for (player_id, action) in self.config.resolve(&InputSource::key(key)) {
            if let Some(player) = self.players.get_mut(player_id) {
                trace!("P{} {:?} pressed via '{}'", player_id + 1, action, key);
                player.press(action);
            }
        }
    }

    /// A key went up on the host
    pub fn key_up(&mut self, key: &str) {
        for (player_id, action) in self.config.resolve(&InputSource::key(key)) {
            if let Some(player) = self.players.get_mut(player_id) {
                player.release(action);
            }
        }
    }

    /// Close the frame once the simulation has consumed it
    pub fn end_frame(&mut self) {
        for player in &mut self.players {
            player.end_frame();
        }
    }

    /// Drop every held button (e.g. on focus loss or match restart)
    pub fn reset(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
    }

    pub fn player(&self, player_id: usize) -> Option<&PlayerInput> {
        self.players.get(player_id)
    }

    /// Button state for every player, in player order
    pub fn players(&self) -> &[PlayerInput] {
        &self.players
    }

    pub fn config(&self) -> &InputConfigManager {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut InputConfigManager {
        &mut self.config
    }

    /// Keys currently bound to `action` for a player
    pub fn keys_for(&self, player_id: usize, action: Action) -> &[InputSource] {
        self.config
            .get_config(player_id)
            .map(|config| config.get_sources(action))
            .unwrap_or(&[])
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_routes_to_one_player() {
        let mut manager = InputManager::default();
        manager.key_down("a");

        assert!(manager.player(0).unwrap().is_pressed(Action::MoveLeft));
        assert!(!manager.player(1).unwrap().is_pressed(Action::MoveLeft));
    }

    #[test]
    fn test_edges_cleared_by_end_frame() {
        let mut manager = InputManager::default();
        manager.key_down("c");
        assert!(manager.player(1).unwrap().just_pressed(Action::Melee));

        manager.end_frame();
        assert!(!manager.player(1).unwrap().just_pressed(Action::Melee));
        assert!(manager.player(1).unwrap().is_pressed(Action::Melee));

        manager.key_up("c");
        assert!(manager.player(1).unwrap().just_released(Action::Melee));
    }

    #[test]
    fn test_unbound_key_ignored() {
        let mut manager = InputManager::default();
        manager.key_down("F12");
        assert!(manager
            .players()
            .iter()
            .all(|p| Action::ALL.iter().all(|a| !p.is_pressed(*a))));
    }

    #[test]
    fn test_remap_through_config() {
        let mut manager = InputManager::default();
        if let Some(config) = manager.config_mut().get_config_mut(0) {
            config.bind(InputSource::key("space"), Action::Melee);
        }
        manager.key_down("space");
        assert!(manager.player(0).unwrap().is_pressed(Action::Melee));
        assert_eq!(manager.keys_for(0, Action::Melee).len(), 2);
    }
}
