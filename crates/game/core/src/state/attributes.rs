//! Attribute block and the additive modifiers owned by status effects.

/// Core combat attributes of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub strength: i32,
    pub intelligence: i32,
    pub defense: i32,
    pub speed: i32,
    /// Critical hit chance on a 0-100 scale.
    pub critical_chance: f64,
    /// Base ordering attribute used to seed turn priority.
    pub initiative: i32,
}

impl Attributes {
    pub const fn new(strength: i32, intelligence: i32, defense: i32, speed: i32) -> Self {
        Self {
            strength,
            intelligence,
            defense,
            speed,
            critical_chance: 0.0,
            initiative: 0,
        }
    }

    pub const fn with_critical_chance(mut self, critical_chance: f64) -> Self {
        self.critical_chance = critical_chance;
        self
    }

    pub const fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = initiative;
        self
    }

    /// Adds each delta of `modifier`.
    ///
    /// Only called by the status effect engine, always paired with
    /// [`Attributes::revert_modifier`].
    pub(crate) fn apply_modifier(&mut self, modifier: &StatModifier) {
        self.strength += modifier.strength;
        self.intelligence += modifier.intelligence;
        self.defense += modifier.defense;
        self.speed += modifier.speed;
    }

    /// Subtracts each delta of `modifier`, undoing [`Attributes::apply_modifier`].
    pub(crate) fn revert_modifier(&mut self, modifier: &StatModifier) {
        self.strength -= modifier.strength;
        self.intelligence -= modifier.intelligence;
        self.defense -= modifier.defense;
        self.speed -= modifier.speed;
    }
}

/// Additive, reversible deltas to attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatModifier {
    pub strength: i32,
    pub intelligence: i32,
    pub defense: i32,
    pub speed: i32,
}

impl StatModifier {
    pub const fn strength(delta: i32) -> Self {
        Self {
            strength: delta,
            intelligence: 0,
            defense: 0,
            speed: 0,
        }
    }

    pub const fn defense(delta: i32) -> Self {
        Self {
            strength: 0,
            intelligence: 0,
            defense: delta,
            speed: 0,
        }
    }

    pub const fn speed(delta: i32) -> Self {
        Self {
            strength: 0,
            intelligence: 0,
            defense: 0,
            speed: delta,
        }
    }

    /// Sum of absolute deltas, used by AI scoring to rank defensive skills.
    pub fn magnitude(&self) -> u32 {
        self.strength.unsigned_abs()
            + self.intelligence.unsigned_abs()
            + self.defense.unsigned_abs()
            + self.speed.unsigned_abs()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude() == 0
    }
}
