//! Per-competitor body condition.
use serde::{Deserialize, Serialize};

/// Condition of one body part, always kept inside `[0, maximum]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPart {
    pub current: f64,
    pub maximum: f64,
}

impl Default for BodyPart {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl BodyPart {
    #[must_use]
    pub const fn new(maximum: f64) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Re-apply the `[0, maximum]` bound, e.g. after decoding.
    pub fn normalize(&mut self) {
        self.maximum = self.maximum.max(0.0);
        self.current = self.current.clamp(0.0, self.maximum);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub head: BodyPart,
    pub torso: BodyPart,
    pub arm_r: BodyPart,
    pub arm_l: BodyPart,
    pub leg_r: BodyPart,
    pub leg_l: BodyPart,
}

impl Body {
    pub fn normalize(&mut self) {
        for part in [
            &mut self.head,
            &mut self.torso,
            &mut self.arm_r,
            &mut self.arm_l,
            &mut self.leg_r,
            &mut self.leg_l,
        ] {
            part.normalize();
        }
    }
}
