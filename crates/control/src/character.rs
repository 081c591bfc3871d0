use glam::Vec3;
use roomview_input::MoveKeys;
use roomview_scene::{NodeId, SceneGraph};
use serde::{Deserialize, Serialize};

/// Per-frame step sizes for the character controller.
///
/// Steps are per frame, not per second: movement speed follows the display
/// refresh rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Distance walked per frame along the facing axis.
    pub move_speed: f32,
    /// Radians turned per frame.
    pub rot_speed: f32,
    /// Walk phase advance per frame while walking.
    pub walk_step: f32,
    /// Peak limb swing in radians.
    pub swing_amplitude: f32,
    /// Height the character is pinned to.
    pub ground_y: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.05,
            rot_speed: 0.05,
            walk_step: 0.2,
            swing_amplitude: 0.5,
            ground_y: 0.0,
        }
    }
}

/// Optional handles to the four animated limbs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limbs {
    pub leg_left: Option<NodeId>,
    pub leg_right: Option<NodeId>,
    pub arm_left: Option<NodeId>,
    pub arm_right: Option<NodeId>,
}

impl Limbs {
    pub fn bound_count(&self) -> usize {
        [self.leg_left, self.leg_right, self.arm_left, self.arm_right]
            .iter()
            .filter(|l| l.is_some())
            .count()
    }
}

/// The character root plus its limbs. Ids point into the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterRig {
    pub root: NodeId,
    pub limbs: Limbs,
}

/// State the frame update reads and writes: held keys, the bound rig and
/// the walk phase.
#[derive(Debug, Clone, Default)]
pub struct SceneContext {
    pub keys: MoveKeys,
    pub config: ControlConfig,
    rig: Option<CharacterRig>,
    walk_time: f32,
}

impl SceneContext {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn bind(&mut self, rig: CharacterRig) {
        tracing::debug!(root = ?rig.root, limbs = rig.limbs.bound_count(), "character bound");
        self.rig = Some(rig);
        self.walk_time = 0.0;
    }

    pub fn rig(&self) -> Option<&CharacterRig> {
        self.rig.as_ref()
    }

    pub fn walk_time(&self) -> f32 {
        self.walk_time
    }

    /// Advance the character by one frame.
    ///
    /// Returns false when no character is bound; the scene is left untouched.
    pub fn update(&mut self, scene: &mut SceneGraph) -> bool {
        let Some(rig) = self.rig else {
            return false;
        };
        let Some(root) = scene.get_mut(rig.root) else {
            return false;
        };

        let keys = self.keys;
        let cfg = self.config;

        if keys.turn_left {
            root.local.rotate_local_y(cfg.rot_speed);
        }
        if keys.turn_right {
            root.local.rotate_local_y(-cfg.rot_speed);
        }

        if keys.forward {
            root.local.translate_local(Vec3::Z, cfg.move_speed);
        }
        if keys.backward {
            root.local.translate_local(Vec3::Z, -cfg.move_speed);
        }

        root.local.position.y = cfg.ground_y;

        let swing = if keys.is_moving() {
            self.walk_time += cfg.walk_step;
            self.walk_time.sin() * cfg.swing_amplitude
        } else {
            self.walk_time = 0.0;
            0.0
        };

        // Legs swing against each other; each arm opposes its leg.
        pose_limb(scene, rig.limbs.leg_left, swing);
        pose_limb(scene, rig.limbs.leg_right, -swing);
        pose_limb(scene, rig.limbs.arm_left, -swing);
        pose_limb(scene, rig.limbs.arm_right, swing);

        true
    }
}

fn pose_limb(scene: &mut SceneGraph, limb: Option<NodeId>, angle: f32) {
    if let Some(node) = limb.and_then(|id| scene.get_mut(id)) {
        node.local.set_euler_x(angle);
    }
}
