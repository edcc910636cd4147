use std::collections::BTreeMap;

use crate::state::EntityId;

/// Accumulated aggro, keyed by defender then attacker.
///
/// Ordered maps keep iteration and tie-breaking deterministic: on equal
/// threat the lowest attacker id wins.
#[derive(Clone, Debug, Default)]
pub struct ThreatTable {
    table: BTreeMap<EntityId, BTreeMap<EntityId, f64>>,
}

impl ThreatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to `target`'s threat towards `source`.
    pub fn add_threat(&mut self, target: EntityId, source: EntityId, amount: f64) {
        *self
            .table
            .entry(target)
            .or_default()
            .entry(source)
            .or_insert(0.0) += amount;
    }

    pub fn threat(&self, target: EntityId, source: EntityId) -> f64 {
        self.table
            .get(&target)
            .and_then(|row| row.get(&source))
            .copied()
            .unwrap_or(0.0)
    }

    /// The living attacker `defender` hates most.
    pub fn highest_threat_target(
        &self,
        defender: EntityId,
        is_alive: impl Fn(EntityId) -> bool,
    ) -> Option<EntityId> {
        let row = self.table.get(&defender)?;
        let mut best: Option<(EntityId, f64)> = None;
        for (&source, &threat) in row {
            if !is_alive(source) {
                continue;
            }
            // strict comparison keeps the lowest id on ties
            if best.is_none_or(|(_, top)| threat > top) {
                best = Some((source, threat));
            }
        }
        best.map(|(source, _)| source)
    }

    /// Removes the entity's own row and every entry naming it as a source.
    pub fn clear_threat(&mut self, entity: EntityId) {
        self.table.remove(&entity);
        for row in self.table.values_mut() {
            row.remove(&entity);
        }
        self.table.retain(|_, row| !row.is_empty());
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_accumulates() {
        let mut table = ThreatTable::new();
        table.add_threat(EntityId(3), EntityId(0), 10.0);
        table.add_threat(EntityId(3), EntityId(0), 5.5);
        assert_eq!(table.threat(EntityId(3), EntityId(0)), 15.5);
        assert_eq!(table.threat(EntityId(0), EntityId(3)), 0.0);
    }

    #[test]
    fn highest_threat_skips_the_dead_and_breaks_ties_low() {
        let mut table = ThreatTable::new();
        let boss = EntityId(5);
        table.add_threat(boss, EntityId(2), 20.0);
        table.add_threat(boss, EntityId(1), 20.0);
        table.add_threat(boss, EntityId(0), 40.0);

        assert_eq!(table.highest_threat_target(boss, |_| true), Some(EntityId(0)));
        assert_eq!(
            table.highest_threat_target(boss, |id| id != EntityId(0)),
            Some(EntityId(1))
        );
        assert_eq!(table.highest_threat_target(boss, |_| false), None);
        assert_eq!(table.highest_threat_target(EntityId(9), |_| true), None);
    }

    #[test]
    fn clearing_removes_row_and_column() {
        let mut table = ThreatTable::new();
        table.add_threat(EntityId(1), EntityId(2), 4.0);
        table.add_threat(EntityId(2), EntityId(1), 4.0);
        table.add_threat(EntityId(3), EntityId(1), 4.0);
        table.add_threat(EntityId(3), EntityId(2), 1.0);

        table.clear_threat(EntityId(1));
        assert_eq!(table.threat(EntityId(2), EntityId(1)), 0.0);
        assert_eq!(table.threat(EntityId(3), EntityId(1)), 0.0);
        assert_eq!(table.threat(EntityId(1), EntityId(2)), 0.0);
        assert_eq!(table.threat(EntityId(3), EntityId(2)), 1.0);
    }
}
