/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const PROJECTS_ROUTE_COMPONENT: &str = "projects";
pub const PROJECTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", PROJECTS_ROUTE_COMPONENT);

pub const MENTOR_ROUTE_COMPONENT: &str = "mentor";
pub const MENTOR_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", MENTOR_ROUTE_COMPONENT);

pub const SIGNED_URL_ROUTE: &str = "signed-url";
pub const SIGNED_URL_READ_ROUTE: &str = "signed-url-read";
