use crate::snapshot::{Entity, MapSnapshot};

/// At most one selected entity, tracked by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    id: Option<String>,
}

impl Selection {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The selected entity as it appears in `snapshot`.
    pub fn resolve<'a>(&self, snapshot: Option<&'a MapSnapshot>) -> Option<&'a Entity> {
        let id = self.id.as_deref()?;
        snapshot?.entity(id)
    }

    /// Returns `true` if the selection changed.
    pub fn set(&mut self, id: Option<&str>) -> bool {
        if self.id.as_deref() == id {
            return false;
        }
        self.id = id.map(str::to_string);
        true
    }

    pub fn clear(&mut self) -> bool {
        self.set(None)
    }

    /// Drop the selection when the entity is gone from a new snapshot.
    /// Returns `true` if it was cleared.
    pub fn retain_in(&mut self, snapshot: &MapSnapshot) -> bool {
        match self.id.as_deref() {
            Some(id) if !snapshot.contains_entity(id) => self.clear(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;
    use crate::snapshot::fixtures::{entity, snapshot};

    #[test]
    fn set_reports_changes() {
        let mut sel = Selection::default();
        assert!(sel.set(Some("a")));
        assert!(!sel.set(Some("a")));
        assert!(sel.set(Some("b")));
        assert!(sel.clear());
        assert!(!sel.clear());
    }

    #[test]
    fn retained_while_present_cleared_when_gone() {
        let mut sel = Selection::default();
        sel.set(Some("a"));
        let still_there = snapshot(vec![entity("a", 5.0, 5.0)], Vec::new());
        assert!(!sel.retain_in(&still_there));
        assert_eq!(sel.id(), Some("a"));

        let gone = snapshot(vec![entity("b", 5.0, 5.0)], Vec::new());
        assert!(sel.retain_in(&gone));
        assert_eq!(sel.id(), None);
    }

    #[test]
    fn resolve_reads_latest_snapshot() {
        let mut sel = Selection::default();
        sel.set(Some("a"));
        let moved = snapshot(vec![entity("a", 250.0, -90.0)], Vec::new());
        let resolved = sel.resolve(Some(&moved)).unwrap();
        assert_eq!(resolved.world_position.x, 250.0);
        assert!(sel.resolve(None).is_none());
    }
}
