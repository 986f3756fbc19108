//! Client-side route resolution over a fixed route table.
//!
//! Routes are slash separated paths (`/user/login`). A request is either absolute
//! (`/settings`) or relative to the current route, where each leading `../` climbs one
//! segment before the remainder is appended (`../../settings` from `/user/login`).

use serde::Serialize;

pub const DEFAULT_ROUTE: &str = "/discovery";
pub const APP_ROOT: &str = "/";

pub const ROOT_SECTIONS: [&str; 4] = ["discovery", "download", "user", "settings"];
pub const ROUTES: [&str; 5] = ["discovery", "download", "user", "settings", "user/login"];

const ASCEND_TOKEN: &str = "../";
const ASCEND_TAIL: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<String>,
    sections: Vec<String>,
}

impl RouteTable {
    pub fn new<R, S>(routes: R, sections: S) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            routes: routes.into_iter().map(Into::into).collect(),
            sections: sections.into_iter().map(Into::into).collect(),
        }
    }

    /// The routes and sections the desktop client ships with.
    pub fn standard() -> Self {
        Self::new(ROUTES, ROOT_SECTIONS)
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn routes(&self) -> &[String] {
        &self.routes
    }

    pub fn contains(&self, path: &str) -> bool {
        let relative = path.strip_prefix('/').unwrap_or(path);
        self.routes.iter().any(|route| route == relative)
    }

    /// Index of the section owning `path`; the application root counts as the first section.
    pub fn section_index(&self, path: &str) -> Option<usize> {
        if path == APP_ROOT {
            return Some(0);
        }
        let section = leading_segment(path)?;
        self.sections.iter().position(|known| known == section)
    }
}

/// Name of a route: its last path segment.
pub fn route_name(route: &str) -> &str {
    route
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
}

fn leading_segment(path: &str) -> Option<&str> {
    path.split('/').find(|segment| !segment.is_empty())
}

/// Splits leading ascend tokens off a relative path. A trailing bare `..` counts too.
pub fn split_ascend(relative: &str) -> (usize, &str) {
    let mut rest = relative;
    let mut count = 0;
    loop {
        if let Some(remaining) = rest.strip_prefix(ASCEND_TOKEN) {
            count += 1;
            rest = remaining;
        } else if rest == ASCEND_TAIL {
            count += 1;
            rest = "";
        } else {
            return (count, rest);
        }
    }
}

/// Drops `ascend` segments from the tail of `current` and appends `suffix`.
///
/// Climbing past the application root stops at the root.
pub fn join_relative(current: &str, ascend: usize, suffix: &str) -> String {
    let mut segments: Vec<&str> = current
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    if ascend > segments.len() {
        log::debug!(
            "relative route climbs {ascend} level(s) from '{current}', clamping at the application root"
        );
    }
    segments.truncate(segments.len().saturating_sub(ascend));
    segments.extend(suffix.split('/').filter(|segment| !segment.is_empty()));
    format!("/{}", segments.join("/"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideDirection {
    None,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub enter: SlideDirection,
    pub leave: SlideDirection,
}

impl Transition {
    pub const NONE: Transition = Transition {
        enter: SlideDirection::None,
        leave: SlideDirection::None,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub from: String,
    pub to: String,
    pub transition: Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRejected {
    /// Another navigation is still loading.
    InFlight,
    /// The target is unknown and the current route is valid, so nothing changes.
    UnknownRoute,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionVisit {
    pub section: String,
    pub route: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSnapshot {
    pub current_route: String,
    pub current_name: String,
    pub loading: bool,
    pub transition: Transition,
    pub last_visited: Vec<SectionVisit>,
}

#[derive(Debug, Clone)]
pub struct NavigationEngine {
    table: RouteTable,
    default_route: String,
    current_route: String,
    last_visited: Vec<String>,
    last_transition: Transition,
    loading: bool,
}

impl NavigationEngine {
    /// Starts at the application root, which is not itself navigable, so the first
    /// navigation always lands somewhere valid.
    pub fn new(table: RouteTable, default_route: &str) -> Result<Self, String> {
        if !table.contains(default_route) {
            return Err(format!(
                "Default route '{default_route}' is missing from the route table"
            ));
        }

        let last_visited = table
            .sections()
            .iter()
            .map(|section| format!("/{section}"))
            .collect();
        Ok(Self {
            table,
            default_route: default_route.to_string(),
            current_route: APP_ROOT.to_string(),
            last_visited,
            last_transition: Transition::NONE,
            loading: false,
        })
    }

    pub fn current_route(&self) -> &str {
        &self.current_route
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Absolute path a request points at, before validation.
    pub fn target_path(&self, requested: &str) -> String {
        if requested.is_empty() {
            return self.default_route.clone();
        }
        if requested.starts_with('/') {
            return requested.to_string();
        }

        let (ascend, suffix) = split_ascend(requested);
        join_relative(&self.current_route, ascend, suffix)
    }

    /// Route a request ends up at, or `None` when it should be ignored.
    pub fn resolve(&self, requested: &str) -> Option<String> {
        let target = self.target_path(requested);
        if self.table.contains(&target) {
            return Some(target);
        }
        if !self.table.contains(&self.current_route) {
            return Some(self.default_route.clone());
        }
        None
    }

    pub fn direction(&self, from: &str, to: &str) -> Transition {
        let (Some(from_index), Some(to_index)) =
            (self.table.section_index(from), self.table.section_index(to))
        else {
            return Transition::NONE;
        };

        if from_index == to_index {
            Transition::NONE
        } else if to_index < from_index {
            Transition {
                enter: SlideDirection::Top,
                leave: SlideDirection::Bottom,
            }
        } else {
            Transition {
                enter: SlideDirection::Bottom,
                leave: SlideDirection::Top,
            }
        }
    }

    pub fn navigate(&mut self, requested: &str) -> Result<Navigation, NavigationRejected> {
        if self.loading {
            log::debug!("navigation to '{requested}' ignored: previous navigation still loading");
            return Err(NavigationRejected::InFlight);
        }

        let Some(next_route) = self.resolve(requested) else {
            log::debug!(
                "navigation to '{requested}' ignored: no such route from '{}'",
                self.current_route
            );
            return Err(NavigationRejected::UnknownRoute);
        };

        let transition = self.direction(&self.current_route, &next_route);
        let from = std::mem::replace(&mut self.current_route, next_route.clone());
        self.last_transition = transition;
        self.remember_visit(&next_route);

        Ok(Navigation {
            from,
            to: next_route,
            transition,
        })
    }

    /// Navigates to the last route visited inside `section`.
    pub fn navigate_section(&mut self, section: &str) -> Result<Navigation, NavigationRejected> {
        let target = self
            .section_target(section)
            .map(str::to_string)
            .unwrap_or_else(|| format!("/{section}"));
        self.navigate(&target)
    }

    pub fn section_target(&self, section: &str) -> Option<&str> {
        let index = self.table.sections().iter().position(|known| known == section)?;
        self.last_visited.get(index).map(String::as_str)
    }

    fn remember_visit(&mut self, route: &str) {
        if route == APP_ROOT {
            return;
        }
        let Some(section) = leading_segment(route) else {
            return;
        };
        if let Some(index) = self.table.sections().iter().position(|known| known == section) {
            self.last_visited[index] = route.to_string();
        }
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            current_route: self.current_route.clone(),
            current_name: route_name(&self.current_route).to_string(),
            loading: self.loading,
            transition: self.last_transition,
            last_visited: self
                .table
                .sections()
                .iter()
                .zip(&self.last_visited)
                .map(|(section, route)| SectionVisit {
                    section: section.clone(),
                    route: route.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_at(route: &str) -> NavigationEngine {
        let mut engine =
            NavigationEngine::new(RouteTable::standard(), DEFAULT_ROUTE).expect("valid engine");
        engine.navigate(route).expect("starting route should be valid");
        engine
    }

    fn all_routes() -> Vec<String> {
        let mut routes: Vec<String> = ROUTES.iter().map(|route| format!("/{route}")).collect();
        routes.push(APP_ROOT.to_string());
        routes
    }

    #[test]
    fn new_rejects_a_default_route_outside_the_table() {
        assert!(NavigationEngine::new(RouteTable::standard(), "/nowhere").is_err());
    }

    #[test]
    fn empty_request_uses_the_default_route() {
        let engine = engine_at("/user/login");
        assert_eq!(engine.resolve(""), Some(DEFAULT_ROUTE.to_string()));
    }

    #[test]
    fn relative_request_climbs_to_a_sibling_section() {
        let mut engine = engine_at("/user/login");

        let navigation = engine.navigate("../../settings").expect("should resolve");

        assert_eq!(navigation.to, "/settings");
        assert_eq!(
            navigation.transition,
            Transition {
                enter: SlideDirection::Bottom,
                leave: SlideDirection::Top,
            }
        );
        assert_eq!(engine.current_route(), "/settings");
    }

    #[test]
    fn relative_request_without_ascend_appends_a_child() {
        let engine = engine_at("/user");
        assert_eq!(engine.target_path("login"), "/user/login");
        assert_eq!(engine.resolve("login"), Some("/user/login".to_string()));
    }

    #[test]
    fn relative_resolution_matches_manual_ascend() {
        let current = "/user/login";
        for ascend in 0..=2 {
            let relative = format!("{}discovery", ASCEND_TOKEN.repeat(ascend));
            let mut segments: Vec<&str> = vec!["user", "login"];
            segments.truncate(segments.len() - ascend);
            segments.push("discovery");
            let manual = format!("/{}", segments.join("/"));

            assert_eq!(join_relative(current, ascend, "discovery"), manual);
            assert_eq!(engine_at(current).target_path(&relative), manual);
        }
    }

    #[test]
    fn ascending_past_the_root_clamps_at_the_root() {
        let engine = engine_at("/user/login");
        assert_eq!(engine.target_path("../../../../download"), "/download");
        assert_eq!(engine.resolve("../../../../download"), Some("/download".to_string()));
        assert_eq!(join_relative("/", 3, ""), "/");
    }

    #[test]
    fn trailing_bare_ascend_counts_as_a_token() {
        assert_eq!(split_ascend("../.."), (2, ""));
        assert_eq!(split_ascend("../../settings"), (2, "settings"));
        assert_eq!(split_ascend("..settings"), (0, "..settings"));
        assert_eq!(engine_at("/user/login").target_path(".."), "/user");
    }

    #[test]
    fn unknown_absolute_request_from_a_valid_route_is_a_no_op() {
        let mut engine = engine_at("/download");

        assert_eq!(engine.resolve("/ranking"), None);
        assert_eq!(engine.navigate("/ranking"), Err(NavigationRejected::UnknownRoute));
        assert_eq!(engine.current_route(), "/download");
    }

    #[test]
    fn any_request_from_an_unknown_route_recovers_to_the_default() {
        let engine =
            NavigationEngine::new(RouteTable::standard(), DEFAULT_ROUTE).expect("valid engine");
        assert_eq!(engine.current_route(), APP_ROOT);

        for requested in ["/ranking", "nowhere", "../..", "", "/settings/extra"] {
            assert_eq!(
                engine.resolve(requested),
                Some(DEFAULT_ROUTE.to_string()),
                "request {requested:?}"
            );
        }
    }

    #[test]
    fn bootstrapping_from_a_stale_saved_route_lands_on_the_default() {
        let mut engine =
            NavigationEngine::new(RouteTable::standard(), DEFAULT_ROUTE).expect("valid engine");
        let navigation = engine.navigate("/old/removed").expect("should fall back");
        assert_eq!(navigation.to, DEFAULT_ROUTE);
        assert_eq!(navigation.transition, Transition::NONE);
    }

    #[test]
    fn direction_moves_along_the_section_order() {
        let engine = engine_at("/discovery");
        assert_eq!(
            engine.direction("/settings", "/download"),
            Transition {
                enter: SlideDirection::Top,
                leave: SlideDirection::Bottom,
            }
        );
        assert_eq!(engine.direction("/user", "/user/login"), Transition::NONE);
        assert_eq!(engine.direction("/", "/discovery"), Transition::NONE);
        assert_eq!(engine.direction("/ranking", "/settings"), Transition::NONE);
    }

    #[test]
    fn direction_is_antisymmetric() {
        let engine = engine_at("/discovery");
        let routes = all_routes();
        for from in &routes {
            assert_eq!(engine.direction(from, from), Transition::NONE);
            for to in &routes {
                let forward = engine.direction(from, to);
                let backward = engine.direction(to, from);
                assert_eq!(forward.enter, backward.leave, "{from} -> {to}");
                assert_eq!(forward.leave, backward.enter, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn loading_rejects_overlapping_navigation() {
        let mut engine = engine_at("/discovery");
        engine.set_loading(true);

        assert_eq!(engine.navigate("/settings"), Err(NavigationRejected::InFlight));
        assert_eq!(engine.current_route(), "/discovery");

        engine.set_loading(false);
        assert!(engine.navigate("/settings").is_ok());
    }

    #[test]
    fn sections_remember_their_last_visited_route() {
        let mut engine = engine_at("/discovery");
        assert_eq!(engine.section_target("user"), Some("/user"));

        engine.navigate("/user/login").expect("valid route");
        engine.navigate("/settings").expect("valid route");
        assert_eq!(engine.section_target("user"), Some("/user/login"));

        let navigation = engine.navigate_section("user").expect("valid route");
        assert_eq!(navigation.to, "/user/login");
        assert_eq!(engine.section_target("nowhere"), None);
    }

    #[test]
    fn rejected_navigation_leaves_history_untouched() {
        let mut engine = engine_at("/user/login");
        engine.navigate("/settings").expect("valid route");
        let before = engine.snapshot();

        assert!(engine.navigate("/user/profile").is_err());
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn snapshot_reports_route_name_and_visits() {
        let engine = engine_at("/user/login");
        let snapshot = engine.snapshot();

        assert_eq!(snapshot.current_name, "login");
        assert_eq!(snapshot.last_visited.len(), ROOT_SECTIONS.len());
        assert_eq!(
            snapshot.last_visited[2],
            SectionVisit {
                section: "user".to_string(),
                route: "/user/login".to_string(),
            }
        );
    }

    #[test]
    fn route_table_ignores_a_single_leading_separator() {
        let table = RouteTable::standard();
        assert!(table.contains("/user/login"));
        assert!(table.contains("user/login"));
        assert!(!table.contains("//user/login"));
        assert!(!table.contains(APP_ROOT));
        assert_eq!(route_name("/user/login"), "login");
        assert_eq!(route_name("/"), "");
    }
}
