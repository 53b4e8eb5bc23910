#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Projects,
    ProjectDetail(String),
    Calendar,
    About,
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Home,
    Projects,
    Calendar,
    About,
}

impl Route {
    /// Parses a location fragment. A leading `#` is optional; empty and `/`
    /// both resolve to the dashboard. Unknown fragments are kept verbatim.
    pub fn parse(fragment: &str) -> Route {
        let route = fragment.strip_prefix('#').unwrap_or(fragment);
        if route.is_empty() || route == "/" {
            return Route::Dashboard;
        }
        if route == "/projects" {
            return Route::Projects;
        }
        if let Some(rest) = route.strip_prefix("/project/") {
            let id = rest.split('/').next().unwrap_or("");
            return Route::ProjectDetail(id.to_string());
        }
        if route == "/calendar" {
            return Route::Calendar;
        }
        if route == "/about" {
            return Route::About;
        }
        Route::NotFound(route.to_string())
    }

    pub fn fragment(&self) -> String {
        match self {
            Route::Dashboard => "#/".to_string(),
            Route::Projects => "#/projects".to_string(),
            Route::ProjectDetail(id) => format!("#/project/{id}"),
            Route::Calendar => "#/calendar".to_string(),
            Route::About => "#/about".to_string(),
            Route::NotFound(raw) => format!("#{raw}"),
        }
    }

    pub fn section(&self) -> Option<NavSection> {
        match self {
            Route::Dashboard => Some(NavSection::Home),
            Route::Projects | Route::ProjectDetail(_) => Some(NavSection::Projects),
            Route::Calendar => Some(NavSection::Calendar),
            Route::About => Some(NavSection::About),
            Route::NotFound(_) => None,
        }
    }
}

impl NavSection {
    pub const ALL: [NavSection; 4] = [
        NavSection::Home,
        NavSection::Projects,
        NavSection::Calendar,
        NavSection::About,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            NavSection::Home => "Dashboard",
            NavSection::Projects => "Projects",
            NavSection::Calendar => "Calendar",
            NavSection::About => "Guide",
        }
    }

    pub fn route(&self) -> Route {
        match self {
            NavSection::Home => Route::Dashboard,
            NavSection::Projects => Route::Projects,
            NavSection::Calendar => Route::Calendar,
            NavSection::About => Route::About,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_known_fragments() {
        assert_eq!(Route::parse("#/"), Route::Dashboard);
        assert_eq!(Route::parse("#"), Route::Dashboard);
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("#/projects"), Route::Projects);
        assert_eq!(Route::parse("#/calendar"), Route::Calendar);
        assert_eq!(Route::parse("#/about"), Route::About);
    }

    #[test]
    fn extracts_the_project_id_segment() {
        assert_eq!(
            Route::parse("#/project/proj_001"),
            Route::ProjectDetail("proj_001".to_string())
        );
        assert_eq!(
            Route::parse("#/project/abc/extra/segments"),
            Route::ProjectDetail("abc".to_string())
        );
        assert_eq!(
            Route::parse("#/project/"),
            Route::ProjectDetail(String::new())
        );
    }

    #[test]
    fn unknown_fragments_are_kept_verbatim() {
        assert_eq!(
            Route::parse("#/project"),
            Route::NotFound("/project".to_string())
        );
        assert_eq!(
            Route::parse("#/missing"),
            Route::NotFound("/missing".to_string())
        );
        assert_eq!(
            Route::parse("#not-even-a-path"),
            Route::NotFound("not-even-a-path".to_string())
        );
    }

    #[test]
    fn groups_routes_into_nav_sections() {
        assert_eq!(Route::Dashboard.section(), Some(NavSection::Home));
        assert_eq!(Route::Projects.section(), Some(NavSection::Projects));
        assert_eq!(
            Route::ProjectDetail("proj_001".to_string()).section(),
            Some(NavSection::Projects)
        );
        assert_eq!(Route::Calendar.section(), Some(NavSection::Calendar));
        assert_eq!(Route::About.section(), Some(NavSection::About));
        assert_eq!(Route::NotFound("/missing".to_string()).section(), None);
    }

    #[test]
    fn fragments_round_trip_through_the_parser() {
        let routes = [
            Route::Dashboard,
            Route::Projects,
            Route::ProjectDetail("proj_007".to_string()),
            Route::Calendar,
            Route::About,
            Route::NotFound("/no/such/view".to_string()),
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.fragment()), route);
        }
    }
}
