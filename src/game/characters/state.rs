// Fighter posture state machine

use crate::game::entity::EntityId;
use glam::Vec2;
use std::mem;

/// What a fighter is currently doing with its body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Posture {
    /// Standing still
    #[default]
    Idle,
    /// Following movement input
    Moving,
    /// Fixed-velocity burst that ignores movement input
    Dashing { remaining: u32, velocity: Vec2 },
    /// Playing a melee commit clip
    MeleeAttack,
    /// Holding the special button with a charge indicator attached
    Charging { projectile: EntityId, held_ticks: u32 },
    /// Holding the ability button behind a shield
    Blocking { shield: EntityId },
}

impl Posture {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Moving => "moving",
            Self::Dashing { .. } => "dashing",
            Self::MeleeAttack => "melee",
            Self::Charging { .. } => "charging",
            Self::Blocking { .. } => "blocking",
        }
    }
}

/// Holds the current posture and logs changes between postures
#[derive(Debug, Default)]
pub struct PostureMachine {
    current: Posture,
}

impl PostureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current posture
    pub fn state(&self) -> Posture {
        self.current
    }

    /// Move to `next`. Staying in the same posture only refreshes its data.
    pub fn transition(&mut self, next: Posture) {
        if mem::discriminant(&self.current) != mem::discriminant(&next) {
            log::trace!("Posture {} -> {}", self.current.name(), next.name());
        }
        self.current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let machine = PostureMachine::new();
        assert_eq!(machine.state(), Posture::Idle);
    }

    #[test]
    fn test_transition() {
        let mut machine = PostureMachine::new();
        machine.transition(Posture::MeleeAttack);
        assert_eq!(machine.state(), Posture::MeleeAttack);

        machine.transition(Posture::Idle);
        assert_eq!(machine.state(), Posture::Idle);
    }

    #[test]
    fn test_same_posture_refreshes_data() {
        let mut machine = PostureMachine::new();
        machine.transition(Posture::Charging {
            projectile: 4,
            held_ticks: 0,
        });
        machine.transition(Posture::Charging {
            projectile: 4,
            held_ticks: 1,
        });

        assert_eq!(
            machine.state(),
            Posture::Charging {
                projectile: 4,
                held_ticks: 1
            }
        );
    }

    #[test]
    fn test_posture_names() {
        let dashing = Posture::Dashing {
            remaining: 3,
            velocity: Vec2::X,
        };
        assert_eq!(dashing.name(), "dashing");
        assert_eq!(Posture::Blocking { shield: 1 }.name(), "blocking");
    }
}
