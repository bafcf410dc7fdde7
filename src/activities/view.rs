//! Filtering and grouping of the activity list

use crate::directory::SectorRef;

use super::types::{Activity, ActivityStatus, Priority};

/// Key and label of the group holding activities without a sector
pub const NO_SECTOR_ID: &str = "sem-setor";
pub const NO_SECTOR_NAME: &str = "Sem Setor";

/// Filter bar state. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Matched case-insensitively against the activity and project names
    pub search: String,
    pub project: Option<String>,
    pub priority: Option<Priority>,
    pub assignee: Option<String>,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || activity.nome.to_lowercase().contains(&needle)
            || activity.project_name().to_lowercase().contains(&needle);

        matches_search
            && self
                .project
                .as_ref()
                .map_or(true, |p| activity.projeto_id.as_ref() == Some(p))
            && self.priority.map_or(true, |p| activity.prioridade == p)
            && self
                .assignee
                .as_ref()
                .map_or(true, |a| activity.responsavel_id.as_ref() == Some(a))
    }

    pub fn apply<'a>(&self, activities: &'a [Activity]) -> Vec<&'a Activity> {
        activities.iter().filter(|a| self.matches(a)).collect()
    }
}

/// One of the four fixed columns of the activities board
#[derive(Debug, Clone, PartialEq)]
pub struct StatusColumn<'a> {
    pub status: ActivityStatus,
    pub activities: Vec<&'a Activity>,
}

impl StatusColumn<'_> {
    /// Droppable id, e.g. `em-andamento`
    pub fn id(&self) -> &'static str {
        self.status.column_id()
    }

    pub fn title(&self) -> &'static str {
        self.status.label()
    }
}

/// Splits activities into the four status columns, in board order.
pub fn group_by_status<'a>(activities: &[&'a Activity]) -> Vec<StatusColumn<'a>> {
    ActivityStatus::ALL
        .into_iter()
        .map(|status| StatusColumn {
            status,
            activities: activities
                .iter()
                .copied()
                .filter(|a| a.status == status)
                .collect(),
        })
        .collect()
}

/// Activities of one sector in the list view
#[derive(Debug, Clone, PartialEq)]
pub struct SectorGroup<'a> {
    pub sector: SectorRef,
    pub activities: Vec<&'a Activity>,
}

/// Groups activities by sector, sorted by sector name with the
/// "no sector" group last.
pub fn group_by_sector<'a>(activities: &[&'a Activity]) -> Vec<SectorGroup<'a>> {
    let mut groups: Vec<SectorGroup<'a>> = Vec::new();
    for &activity in activities {
        let sector = activity.setor.clone().unwrap_or_else(|| SectorRef {
            id: NO_SECTOR_ID.to_string(),
            nome: NO_SECTOR_NAME.to_string(),
        });
        match groups.iter_mut().find(|g| g.sector.id == sector.id) {
            Some(group) => group.activities.push(activity),
            None => groups.push(SectorGroup {
                sector,
                activities: vec![activity],
            }),
        }
    }
    groups.sort_by(|a, b| {
        let a_none = a.sector.id == NO_SECTOR_ID;
        let b_none = b.sector.id == NO_SECTOR_ID;
        a_none
            .cmp(&b_none)
            .then_with(|| a.sector.nome.cmp(&b.sector.nome))
    });
    groups
}
