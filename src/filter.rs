use crate::model::Project;

/// Current project-list filter. Empty search and unset selects match
/// everything; active criteria are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub osc: Option<String>,
    pub category: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.osc.is_none() && self.category.is_none()
    }

    pub fn matches(&self, project: &Project) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = project.name.to_lowercase().contains(&needle)
                || project.location.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(osc) = &self.osc {
            if &project.osc != osc {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &project.category != category {
                return false;
            }
        }
        true
    }
}

/// Indices into `projects` that satisfy `criteria`, in dataset order.
pub fn filter_projects(projects: &[Project], criteria: &FilterCriteria) -> Vec<usize> {
    projects
        .iter()
        .enumerate()
        .filter(|(_, project)| criteria.matches(project))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::project;

    fn sample_projects() -> Vec<Project> {
        let mut a = project("proj_001", "Festival Groove na Praça");
        a.osc = "instituto_realize".to_string();
        a.category = "Cultura".to_string();
        let mut b = project("proj_002", "Copa da Juventude");
        b.osc = "apj".to_string();
        b.category = "Esporte".to_string();
        b.location = "Ginásio Municipal".to_string();
        let mut c = project("proj_003", "Sarau das Vozes");
        c.osc = "criar".to_string();
        c.category = "Cultura".to_string();
        let mut d = project("proj_004", "Corrida Solidária");
        d.osc = "apj".to_string();
        d.category = "Esporte".to_string();
        let mut e = project("proj_005", "Mostra de Teatro");
        e.osc = "criar".to_string();
        e.category = "Cultura".to_string();
        e.location = "Teatro da Praça".to_string();
        vec![a, b, c, d, e]
    }

    #[test]
    fn empty_criteria_keep_every_project_in_order() {
        let projects = sample_projects();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(filter_projects(&projects, &criteria), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            search: "FESTIVAL".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_projects(&projects, &criteria), vec![0]);
    }

    #[test]
    fn search_also_matches_location() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            search: "ginásio".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_projects(&projects, &criteria), vec![1]);
    }

    #[test]
    fn search_term_praça_spans_name_and_location() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            search: "praça".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_projects(&projects, &criteria), vec![0, 4]);
    }

    #[test]
    fn osc_select_keeps_exact_matches_only() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            osc: Some("apj".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_projects(&projects, &criteria), vec![1, 3]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            search: "corrida".to_string(),
            osc: Some("apj".to_string()),
            category: Some("Esporte".to_string()),
        };
        assert_eq!(filter_projects(&projects, &criteria), vec![3]);
    }

    #[test]
    fn category_select_narrows_the_list() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            category: Some("Cultura".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_projects(&projects, &criteria), vec![0, 2, 4]);
    }

    #[test]
    fn values_absent_from_the_dataset_yield_an_empty_result() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            osc: Some("osc_fantasma".to_string()),
            ..Default::default()
        };
        assert!(filter_projects(&projects, &criteria).is_empty());
    }

    #[test]
    fn every_kept_project_satisfies_the_criteria() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            search: "a".to_string(),
            category: Some("Esporte".to_string()),
            ..Default::default()
        };
        let kept = filter_projects(&projects, &criteria);
        for idx in &kept {
            assert!(criteria.matches(&projects[*idx]));
        }
        for (idx, project) in projects.iter().enumerate() {
            if !kept.contains(&idx) {
                assert!(!criteria.matches(project));
            }
        }
    }
}
