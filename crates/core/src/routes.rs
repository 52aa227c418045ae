//! Route classification

/// Whether a path needs a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    Public,
}

/// Allow-list of protected path substrings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoutes {
    paths: Vec<String>,
}

impl ProtectedRoutes {
    pub fn new(paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Classify a path by substring containment
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.paths.iter().any(|p| path.contains(p.as_str())) {
            RouteClass::Protected
        } else {
            RouteClass::Public
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.classify(path) == RouteClass::Protected
    }
}

/// Whether a form method submits without side effects
pub fn is_read_only_method(method: &str) -> bool {
    let method = method.trim();
    method.is_empty() || method.eq_ignore_ascii_case("get") || method.eq_ignore_ascii_case("head")
}
