// ============================================================================
// Event Aggregation
// ============================================================================

use tracing::warn;

use crate::model::Registration;

/// One line of the attendance table. Contact details are deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub name: String,
    pub team_name: String,
    pub organization_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGroup {
    pub event_name: String,
    pub participants: Vec<ParticipantRow>,
}

/// Event groups in first-seen order.
///
/// Event names are compared verbatim, so "Hack Day" and "hack day" form two
/// groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventGroups {
    groups: Vec<EventGroup>,
}

impl EventGroups {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventGroup> {
        self.groups.iter()
    }

    pub fn get(&self, event_name: &str) -> Option<&EventGroup> {
        self.groups.iter().find(|g| g.event_name == event_name)
    }

    pub fn total_participants(&self) -> usize {
        self.groups.iter().map(|g| g.participants.len()).sum()
    }

    fn entry(&mut self, event_name: &str) -> &mut EventGroup {
        let idx = match self.groups.iter().position(|g| g.event_name == event_name) {
            Some(idx) => idx,
            None => {
                self.groups.push(EventGroup {
                    event_name: event_name.to_string(),
                    participants: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }
}

impl<'a> IntoIterator for &'a EventGroups {
    type Item = &'a EventGroup;
    type IntoIter = std::slice::Iter<'a, EventGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Flatten registrations into per-event participant lists.
///
/// Unpaid registrations contribute nothing, even if the caller forgot to
/// filter them out. A team with no members still opens its event group.
pub fn group_by_event(registrations: &[Registration]) -> EventGroups {
    let mut groups = EventGroups::default();

    for reg in registrations {
        if !reg.is_paid() {
            warn!(registration = %reg.id, "skipping unpaid registration");
            continue;
        }
        for team in &reg.teams {
            let group = groups.entry(team.event_label());
            group
                .participants
                .extend(team.members.iter().map(|m| ParticipantRow {
                    name: m.name.clone(),
                    team_name: team.team_name.clone(),
                    organization_name: reg.organization.name.clone(),
                }));
        }
    }

    groups
}
