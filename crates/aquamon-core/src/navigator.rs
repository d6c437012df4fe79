//! Hierarchy navigation state machine.
//!
//! Selection is a tagged union so that invalid combinations (a well
//! selected with no pole, etc.) are unrepresentable. Selecting a
//! password-protected item suspends the transition: the navigator
//! parks the target as a pending selection and the caller is expected
//! to run it through the access gate, reporting the outcome via
//! [`Navigator::resolve_pending`]. A failed verification leaves the
//! prior selection intact and keeps the pending target for retry.

use uuid::Uuid;

use crate::error::{AquamonError, AquamonResult};
use crate::models::{Pole, Region, Well};

/// The committed selection, one level per variant.
#[derive(Debug, Clone)]
pub enum Selection {
    Root,
    Region(Region),
    Pole { region: Region, pole: Pole },
    Well { region: Region, pole: Pole, well: Well },
}

impl Selection {
    pub fn region(&self) -> Option<&Region> {
        match self {
            Selection::Root => None,
            Selection::Region(r) => Some(r),
            Selection::Pole { region, .. } | Selection::Well { region, .. } => Some(region),
        }
    }

    pub fn pole(&self) -> Option<&Pole> {
        match self {
            Selection::Pole { pole, .. } | Selection::Well { pole, .. } => Some(pole),
            _ => None,
        }
    }

    pub fn well(&self) -> Option<&Well> {
        match self {
            Selection::Well { well, .. } => Some(well),
            _ => None,
        }
    }
}

/// The data fetch a committed transition asks the caller to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    None,
    /// Entering a region view: load its poles.
    LoadPoles(Uuid),
    /// Entering a pole view: load its wells.
    LoadWells(Uuid),
}

/// Outcome of a selection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The transition committed; perform the given fetch.
    Committed(NavEffect),
    /// The target is protected; prompt for its secret and report the
    /// verification result through [`Navigator::resolve_pending`].
    SecretRequired,
}

#[derive(Debug, Clone)]
enum PendingSelection {
    Region(Region),
    Pole(Pole),
    Well(Well),
}

#[derive(Debug, Clone)]
pub struct Navigator {
    selection: Selection,
    pending: Option<PendingSelection>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            selection: Selection::Root,
            pending: None,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// True while a protected selection awaits verification.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Select a region. Allowed from any state; descendants are
    /// cleared.
    pub fn select_region(&mut self, region: Region) -> SelectOutcome {
        if region.is_password_protected {
            self.pending = Some(PendingSelection::Region(region));
            return SelectOutcome::SecretRequired;
        }
        self.commit(PendingSelection::Region(region))
    }

    /// Select a pole within the currently selected region.
    pub fn select_pole(&mut self, pole: Pole) -> AquamonResult<SelectOutcome> {
        let region = self
            .selection
            .region()
            .ok_or_else(|| AquamonError::Validation {
                message: "cannot select a pole with no region selected".into(),
            })?;
        if pole.region_id != region.id {
            return Err(AquamonError::Validation {
                message: "pole does not belong to the selected region".into(),
            });
        }
        if pole.is_password_protected {
            self.pending = Some(PendingSelection::Pole(pole));
            return Ok(SelectOutcome::SecretRequired);
        }
        Ok(self.commit(PendingSelection::Pole(pole)))
    }

    /// Select a well within the currently selected pole.
    pub fn select_well(&mut self, well: Well) -> AquamonResult<SelectOutcome> {
        let pole = self.selection.pole().ok_or_else(|| AquamonError::Validation {
            message: "cannot select a well with no pole selected".into(),
        })?;
        if well.pole_id != pole.id {
            return Err(AquamonError::Validation {
                message: "well does not belong to the selected pole".into(),
            });
        }
        if well.is_password_protected {
            self.pending = Some(PendingSelection::Well(well));
            return Ok(SelectOutcome::SecretRequired);
        }
        Ok(self.commit(PendingSelection::Well(well)))
    }

    /// Report the access gate's verdict for the pending selection.
    ///
    /// `verified == true` commits the suspended transition and returns
    /// its entry effect exactly once. `verified == false` keeps the
    /// prior selection and leaves the pending target in place so the
    /// prompt can be retried.
    pub fn resolve_pending(&mut self, verified: bool) -> AquamonResult<SelectOutcome> {
        let pending = self.pending.clone().ok_or_else(|| AquamonError::Validation {
            message: "no pending selection to resolve".into(),
        })?;
        if !verified {
            return Ok(SelectOutcome::SecretRequired);
        }
        self.pending = None;
        Ok(self.commit(pending))
    }

    /// Abandon the pending selection, staying where we are.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Go up one level, returning the re-entry effect of the new
    /// level.
    pub fn up(&mut self) -> NavEffect {
        self.pending = None;
        match std::mem::replace(&mut self.selection, Selection::Root) {
            Selection::Root | Selection::Region(_) => {
                self.selection = Selection::Root;
                NavEffect::None
            }
            Selection::Pole { region, .. } => {
                let effect = NavEffect::LoadPoles(region.id);
                self.selection = Selection::Region(region);
                effect
            }
            Selection::Well { region, pole, .. } => {
                let effect = NavEffect::LoadWells(pole.id);
                self.selection = Selection::Pole { region, pole };
                effect
            }
        }
    }

    /// Reset to the root view.
    pub fn clear(&mut self) {
        self.selection = Selection::Root;
        self.pending = None;
    }

    fn commit(&mut self, target: PendingSelection) -> SelectOutcome {
        match target {
            PendingSelection::Region(region) => {
                let effect = NavEffect::LoadPoles(region.id);
                self.selection = Selection::Region(region);
                SelectOutcome::Committed(effect)
            }
            PendingSelection::Pole(pole) => {
                // commit() is only reached after select_pole validated
                // the parent, so the region is always present here.
                let region = match std::mem::replace(&mut self.selection, Selection::Root) {
                    Selection::Region(r)
                    | Selection::Pole { region: r, .. }
                    | Selection::Well { region: r, .. } => r,
                    Selection::Root => unreachable!("pole committed without a region"),
                };
                let effect = NavEffect::LoadWells(pole.id);
                self.selection = Selection::Pole { region, pole };
                SelectOutcome::Committed(effect)
            }
            PendingSelection::Well(well) => {
                let (region, pole) = match std::mem::replace(&mut self.selection, Selection::Root)
                {
                    Selection::Pole { region, pole } | Selection::Well { region, pole, .. } => {
                        (region, pole)
                    }
                    _ => unreachable!("well committed without a pole"),
                };
                self.selection = Selection::Well { region, pole, well };
                SelectOutcome::Committed(NavEffect::None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn region(protected: bool) -> Region {
        Region {
            id: Uuid::new_v4(),
            name: "North".into(),
            description: String::new(),
            created_by: "alice".into(),
            updated_by: "alice".into(),
            is_password_protected: protected,
            protecting_secret: None,
            protected_at: None,
            protected_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn pole(region_id: Uuid, protected: bool) -> Pole {
        Pole {
            id: Uuid::new_v4(),
            name: "P-1".into(),
            description: String::new(),
            region_id,
            location: "field 3".into(),
            created_by: "alice".into(),
            updated_by: "alice".into(),
            is_password_protected: protected,
            protecting_secret: None,
            protected_at: None,
            protected_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn well(pole_id: Uuid) -> Well {
        use crate::models::{CurrentReading, WellStatus};
        Well {
            id: Uuid::new_v4(),
            name: "W-1".into(),
            pole_id,
            status: WellStatus::Active,
            reading: CurrentReading {
                water_level: 0.0,
                pressure: 0.0,
                flow_rate: 0.0,
                observations: String::new(),
                last_measurement_at: Utc::now(),
            },
            created_by: "alice".into(),
            updated_by: "alice".into(),
            is_password_protected: false,
            protecting_secret: None,
            protected_at: None,
            protected_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn root_to_well_walk() {
        let mut nav = Navigator::new();
        let r = region(false);
        let p = pole(r.id, false);
        let w = well(p.id);

        assert_eq!(
            nav.select_region(r.clone()),
            SelectOutcome::Committed(NavEffect::LoadPoles(r.id))
        );
        assert_eq!(
            nav.select_pole(p.clone()).unwrap(),
            SelectOutcome::Committed(NavEffect::LoadWells(p.id))
        );
        assert_eq!(
            nav.select_well(w.clone()).unwrap(),
            SelectOutcome::Committed(NavEffect::None)
        );
        assert_eq!(nav.selection().well().unwrap().id, w.id);
        assert_eq!(nav.selection().region().unwrap().id, r.id);
    }

    #[test]
    fn pole_requires_matching_region() {
        let mut nav = Navigator::new();
        let r = region(false);
        nav.select_region(r);

        let stray = pole(Uuid::new_v4(), false);
        assert!(nav.select_pole(stray).is_err());
        assert!(nav.selection().pole().is_none());
    }

    #[test]
    fn selecting_without_ancestor_is_an_error() {
        let mut nav = Navigator::new();
        assert!(nav.select_pole(pole(Uuid::new_v4(), false)).is_err());
        assert!(nav.select_well(well(Uuid::new_v4())).is_err());
    }

    #[test]
    fn protected_pole_suspends_until_verified() {
        let mut nav = Navigator::new();
        let r = region(false);
        let p = pole(r.id, true);
        nav.select_region(r);

        assert_eq!(
            nav.select_pole(p.clone()).unwrap(),
            SelectOutcome::SecretRequired
        );
        // Still in the region view, pending retained.
        assert!(nav.selection().pole().is_none());
        assert!(nav.has_pending());

        // Wrong secret: stay put, still retryable.
        assert_eq!(
            nav.resolve_pending(false).unwrap(),
            SelectOutcome::SecretRequired
        );
        assert!(nav.selection().pole().is_none());
        assert!(nav.has_pending());

        // Correct secret: commit and fetch wells exactly once.
        assert_eq!(
            nav.resolve_pending(true).unwrap(),
            SelectOutcome::Committed(NavEffect::LoadWells(p.id))
        );
        assert_eq!(nav.selection().pole().unwrap().id, p.id);
        assert!(!nav.has_pending());
        assert!(nav.resolve_pending(true).is_err());
    }

    #[test]
    fn cancel_pending_keeps_prior_selection() {
        let mut nav = Navigator::new();
        let r = region(true);
        assert_eq!(nav.select_region(r), SelectOutcome::SecretRequired);
        nav.cancel_pending();
        assert!(!nav.has_pending());
        assert!(matches!(nav.selection(), Selection::Root));
    }

    #[test]
    fn up_walks_back_with_reentry_effects() {
        let mut nav = Navigator::new();
        let r = region(false);
        let p = pole(r.id, false);
        let w = well(p.id);
        nav.select_region(r.clone());
        nav.select_pole(p.clone()).unwrap();
        nav.select_well(w).unwrap();

        assert_eq!(nav.up(), NavEffect::LoadWells(p.id));
        assert!(nav.selection().well().is_none());
        assert_eq!(nav.up(), NavEffect::LoadPoles(r.id));
        assert!(nav.selection().pole().is_none());
        assert_eq!(nav.up(), NavEffect::None);
        assert!(matches!(nav.selection(), Selection::Root));
    }

    #[test]
    fn selecting_a_region_resets_descendants() {
        let mut nav = Navigator::new();
        let r1 = region(false);
        let p = pole(r1.id, false);
        nav.select_region(r1);
        nav.select_pole(p).unwrap();

        let r2 = region(false);
        assert_eq!(
            nav.select_region(r2.clone()),
            SelectOutcome::Committed(NavEffect::LoadPoles(r2.id))
        );
        assert!(nav.selection().pole().is_none());
    }
}
