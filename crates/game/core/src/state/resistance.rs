use strum::{EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Damage element for resistances and skill affinity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCount, EnumIter, EnumString, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
}

impl Element {
    const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Per-element resistance percentages.
///
/// 50 halves elemental damage, 100 negates it, negative values are
/// weaknesses. Unset elements default to 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resistances {
    values: [f64; Element::COUNT],
}

impl Resistances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element: Element) -> f64 {
        self.values[element.index()]
    }

    pub fn set(&mut self, element: Element, percent: f64) {
        self.values[element.index()] = percent;
    }

    pub fn with(mut self, element: Element, percent: f64) -> Self {
        self.set(element, percent);
        self
    }

    /// Damage multiplier for this element: `1 - resistance / 100`, never negative.
    pub fn multiplier(&self, element: Element) -> f64 {
        (1.0 - self.get(element) / 100.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn defaults_to_zero_for_every_element() {
        let resistances = Resistances::new();
        for element in Element::iter() {
            assert_eq!(resistances.get(element), 0.0);
            assert_eq!(resistances.multiplier(element), 1.0);
        }
    }

    #[test]
    fn multiplier_tracks_percentage() {
        let resistances = Resistances::new()
            .with(Element::Fire, 50.0)
            .with(Element::Dark, -25.0)
            .with(Element::Light, 150.0);

        assert_eq!(resistances.multiplier(Element::Fire), 0.5);
        assert_eq!(resistances.multiplier(Element::Dark), 1.25);
        assert_eq!(resistances.multiplier(Element::Light), 0.0);
        assert_eq!(resistances.multiplier(Element::Water), 1.0);
    }

    #[test]
    fn parses_element_names() {
        assert_eq!("Fire".parse::<Element>().ok(), Some(Element::Fire));
        assert!("Plasma".parse::<Element>().is_err());
        assert_eq!(Element::Air.as_str(), "Air");
    }
}
