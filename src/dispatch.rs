// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Emergency Dispatch
//
// Responders escalate Idle -> Notified -> Dispatched and never step back
// within a run. De-escalation of the crowd status leaves them where they
// are until the simulator is reset.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ContactSpec;
use crate::types::{ContactChange, ContactStatus, EmergencyContact, SystemStatus};

/// Highest contact status the current system status warrants.
pub fn target_for(status: SystemStatus) -> Option<ContactStatus> {
    match status {
        SystemStatus::CriticalRisk => Some(ContactStatus::Dispatched),
        SystemStatus::HighDensityCell
        | SystemStatus::HighDensityWarning
        | SystemStatus::CriticalDensityCell => Some(ContactStatus::Notified),
        SystemStatus::Normal | SystemStatus::Initializing | SystemStatus::Error => None,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ContactRoster {
    contacts: Vec<EmergencyContact>,
    eta_ranges: Vec<[u32; 2]>,
}

impl ContactRoster {
    pub fn new(specs: &[ContactSpec]) -> Self {
        Self {
            contacts: specs
                .iter()
                .map(|s| EmergencyContact {
                    role: s.role.clone(),
                    status: ContactStatus::Idle,
                    eta: None,
                })
                .collect(),
            eta_ranges: specs.iter().map(|s| s.eta_minutes).collect(),
        }
    }

    /// Advance the roster one step toward what `status` warrants.
    ///
    /// Every idle contact is notified at once. While the status calls for
    /// dispatch, one contact that was already notified before this tick is
    /// dispatched per tick, in roster order.
    pub fn advance<R: Rng + ?Sized>(&mut self, status: SystemStatus, rng: &mut R) -> Vec<ContactChange> {
        let mut changes = Vec::new();
        let target = match target_for(status) {
            Some(t) => t,
            None => return changes,
        };

        let already_notified: Vec<bool> = self
            .contacts
            .iter()
            .map(|c| c.status == ContactStatus::Notified)
            .collect();

        for contact in self.contacts.iter_mut() {
            if contact.status == ContactStatus::Idle {
                contact.status = ContactStatus::Notified;
                changes.push(ContactChange {
                    role: contact.role.clone(),
                    from: ContactStatus::Idle,
                    to: ContactStatus::Notified,
                    eta: None,
                });
            }
        }

        if target == ContactStatus::Dispatched {
            let next = already_notified.iter().position(|&notified| notified);
            if let Some(idx) = next {
                let [min, max] = self.eta_ranges[idx];
                let minutes = rng.gen_range(min..=max);
                let contact = &mut self.contacts[idx];
                contact.status = ContactStatus::Dispatched;
                contact.eta = Some(format!("{} min", minutes));
                changes.push(ContactChange {
                    role: contact.role.clone(),
                    from: ContactStatus::Notified,
                    to: ContactStatus::Dispatched,
                    eta: contact.eta.clone(),
                });
            }
        }

        changes
    }

    pub fn contacts(&self) -> &[EmergencyContact] {
        &self.contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_contacts;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn statuses(roster: &ContactRoster) -> Vec<ContactStatus> {
        roster.contacts().iter().map(|c| c.status).collect()
    }

    fn dispatched(roster: &ContactRoster) -> usize {
        statuses(roster).iter().filter(|s| **s == ContactStatus::Dispatched).count()
    }

    #[test]
    fn test_new_roster_idle() {
        let roster = ContactRoster::new(&default_contacts());
        assert!(roster.contacts().iter().all(|c| c.status == ContactStatus::Idle && c.eta.is_none()));
    }

    #[test]
    fn test_normal_does_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roster = ContactRoster::new(&default_contacts());
        assert!(roster.advance(SystemStatus::Normal, &mut rng).is_empty());
        assert!(roster.advance(SystemStatus::Initializing, &mut rng).is_empty());
    }

    #[test]
    fn test_warning_notifies_everyone_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roster = ContactRoster::new(&default_contacts());
        let changes = roster.advance(SystemStatus::HighDensityCell, &mut rng);
        assert_eq!(changes.len(), 4);
        assert!(statuses(&roster).iter().all(|s| *s == ContactStatus::Notified));
        assert!(roster.advance(SystemStatus::HighDensityWarning, &mut rng).is_empty());
    }

    #[test]
    fn test_critical_risk_dispatches_on_second_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut roster = ContactRoster::new(&default_contacts());
        roster.advance(SystemStatus::CriticalRisk, &mut rng);
        assert_eq!(dispatched(&roster), 0);

        let changes = roster.advance(SystemStatus::CriticalRisk, &mut rng);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].role, "Police Control");
        assert_eq!(changes[0].eta, roster.contacts()[0].eta);
        assert_eq!(roster.contacts()[0].status, ContactStatus::Dispatched);
        let eta = roster.contacts()[0].eta.clone().unwrap();
        let minutes: u32 = eta.trim_end_matches(" min").parse().unwrap();
        assert!((3..=6).contains(&minutes));
    }

    #[test]
    fn test_dispatch_one_per_tick_in_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut roster = ContactRoster::new(&default_contacts());
        roster.advance(SystemStatus::HighDensityWarning, &mut rng);
        for expected in 1..=4 {
            roster.advance(SystemStatus::CriticalRisk, &mut rng);
            assert_eq!(dispatched(&roster), expected);
        }
        assert!(roster.advance(SystemStatus::CriticalRisk, &mut rng).is_empty());
    }

    #[test]
    fn test_de_escalation_keeps_status() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut roster = ContactRoster::new(&default_contacts());
        roster.advance(SystemStatus::CriticalRisk, &mut rng);
        roster.advance(SystemStatus::CriticalRisk, &mut rng);
        let before = statuses(&roster);
        roster.advance(SystemStatus::Normal, &mut rng);
        roster.advance(SystemStatus::HighDensityCell, &mut rng);
        assert_eq!(statuses(&roster), before);
    }

    #[test]
    fn test_empty_roster() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut roster = ContactRoster::new(&[]);
        assert!(roster.advance(SystemStatus::CriticalRisk, &mut rng).is_empty());
    }
}
