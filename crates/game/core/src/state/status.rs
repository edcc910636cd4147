//! Status effect data carried by entities.
//!
//! Effects are temporary conditions that deal or heal damage every turn,
//! shift attributes, or restrict what the entity may do. Durations are
//! counted in the owning entity's turns.
//!
//! The collection here is a plain ordered list; all rule logic (stacking,
//! ticking, modifier bookkeeping) lives in [`crate::effects`].

use super::attributes::StatModifier;

/// Broad category of a status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    Buff,
    Debuff,
    /// Damage over time.
    DoT,
    /// Heal over time.
    HoT,
    /// Restricts actions (see [`ControlKind`]).
    Control,
}

/// Restriction imposed by a control effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlKind {
    /// Cannot act at all; the turn is skipped.
    Stun,
    /// Cannot use skills that cost mana.
    Silence,
}

/// A single status effect instance.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    /// Stacking key.
    pub name: String,
    pub kind: StatusEffectKind,
    /// Remaining turns.
    pub duration: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_per_turn: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub healing_per_turn: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifier: Option<StatModifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stackable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub control: Option<ControlKind>,
}

impl StatusEffect {
    pub fn new(name: impl Into<String>, kind: StatusEffectKind, duration: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            duration,
            damage_per_turn: 0,
            healing_per_turn: 0,
            modifier: None,
            stackable: false,
            control: None,
        }
    }

    /// Attribute buff or debuff.
    pub fn modifier(
        name: impl Into<String>,
        kind: StatusEffectKind,
        duration: u32,
        modifier: StatModifier,
    ) -> Self {
        Self::new(name, kind, duration).with_modifier(modifier)
    }

    /// Damage over time.
    pub fn dot(name: impl Into<String>, duration: u32, damage_per_turn: u32) -> Self {
        let mut effect = Self::new(name, StatusEffectKind::DoT, duration);
        effect.damage_per_turn = damage_per_turn;
        effect
    }

    /// Heal over time.
    pub fn hot(name: impl Into<String>, duration: u32, healing_per_turn: u32) -> Self {
        let mut effect = Self::new(name, StatusEffectKind::HoT, duration);
        effect.healing_per_turn = healing_per_turn;
        effect
    }

    /// Crowd control.
    pub fn control(name: impl Into<String>, duration: u32, control: ControlKind) -> Self {
        let mut effect = Self::new(name, StatusEffectKind::Control, duration);
        effect.control = Some(control);
        effect
    }

    pub fn with_modifier(mut self, modifier: StatModifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }
}

/// Active status effects on an entity, in the order they were applied.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Checks if any instance with this name is active.
    pub fn has(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name == name)
    }

    /// First active instance with this name.
    pub fn get(&self, name: &str) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.name == name)
    }

    /// Number of active instances with this name.
    pub fn count(&self, name: &str) -> usize {
        self.effects.iter().filter(|e| e.name == name).count()
    }

    /// Checks if any active effect imposes this control.
    pub fn has_control(&self, control: ControlKind) -> bool {
        self.effects.iter().any(|e| e.control == Some(control))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut StatusEffect> {
        self.effects.iter_mut().find(|e| e.name == name)
    }

    pub(crate) fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [StatusEffect] {
        &mut self.effects
    }

    /// Removes and returns every instance matching `predicate`, keeping the
    /// order of the rest.
    pub(crate) fn drain_where(
        &mut self,
        mut predicate: impl FnMut(&StatusEffect) -> bool,
    ) -> Vec<StatusEffect> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.effects.len());
        for effect in self.effects.drain(..) {
            if predicate(&effect) {
                removed.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.effects = kept;
        removed
    }
}
