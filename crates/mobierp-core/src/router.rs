// ── Navigation ──
//
// A flat, static route table: home plus a list, detail and form route per
// entity kind. `Navigator` is the stack of visited routes that screens
// push onto and pop from.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tokio::sync::watch;
use tracing::debug;

use crate::entity::EntityKind;
use crate::error::CoreError;

/// Which of the three screens of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Screen {
    List,
    Detail,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Entity { kind: EntityKind, screen: Screen },
}

/// Header shown above a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderConfig {
    pub title: String,
    pub show_back: bool,
}

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub name: String,
    pub route: Route,
    pub header: HeaderConfig,
}

static ROUTES: LazyLock<Vec<RouteEntry>> = LazyLock::new(|| {
    std::iter::once(Route::Home)
        .chain(EntityKind::iter().flat_map(|kind| {
            Screen::iter().map(move |screen| Route::Entity { kind, screen })
        }))
        .map(|route| RouteEntry {
            name: route.to_string(),
            route,
            header: route.header(),
        })
        .collect()
});

/// Every route the app knows, home first.
pub fn route_table() -> &'static [RouteEntry] {
    &ROUTES
}

impl Route {
    pub fn list(kind: EntityKind) -> Self {
        Self::Entity {
            kind,
            screen: Screen::List,
        }
    }

    pub fn detail(kind: EntityKind) -> Self {
        Self::Entity {
            kind,
            screen: Screen::Detail,
        }
    }

    pub fn form(kind: EntityKind) -> Self {
        Self::Entity {
            kind,
            screen: Screen::Form,
        }
    }

    /// Look a route up by its table name (`purchase-receive/list`).
    pub fn resolve(name: &str) -> Result<Self, CoreError> {
        route_table()
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.route)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "route".into(),
                identifier: name.to_owned(),
            })
    }

    pub fn header(self) -> HeaderConfig {
        match self {
            Self::Home => HeaderConfig {
                title: "Home".into(),
                show_back: false,
            },
            Self::Entity { kind, screen } => HeaderConfig {
                title: match screen {
                    Screen::List => kind.plural().to_owned(),
                    Screen::Detail => kind.singular().to_owned(),
                    // Shared by create and edit; the form names its own mode.
                    Screen::Form => format!("{} form", kind.singular()),
                },
                show_back: true,
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Entity { kind, screen } => write!(f, "{kind}/{screen}"),
        }
    }
}

// ── Navigator ────────────────────────────────────────────────────

/// A visited route plus its parameters (`id`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub route: Route,
    pub params: BTreeMap<String, String>,
}

impl NavEntry {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Navigation stack shared by all screens. Cloning shares the stack.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Arc<watch::Sender<Vec<NavEntry>>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// A stack rooted at `Home`.
    pub fn new() -> Self {
        let (stack, _) = watch::channel(vec![NavEntry::new(Route::Home)]);
        Self {
            stack: Arc::new(stack),
        }
    }

    pub fn navigate(&self, entry: NavEntry) {
        debug!(route = %entry.route, params = ?entry.params, "navigate");
        self.stack.send_modify(|stack| stack.push(entry));
    }

    /// Pop the top screen. The root is never popped; returns `false` then.
    pub fn back(&self) -> bool {
        let mut popped = false;
        self.stack.send_if_modified(|stack| {
            if stack.len() > 1 {
                stack.pop();
                popped = true;
            }
            popped
        });
        if popped {
            debug!(route = %self.current().route, "back");
        }
        popped
    }

    pub fn current(&self) -> NavEntry {
        self.stack
            .borrow()
            .last()
            .cloned()
            .unwrap_or_else(|| NavEntry::new(Route::Home))
    }

    pub fn depth(&self) -> usize {
        self.stack.borrow().len()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<NavEntry>> {
        self.stack.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn table_has_home_and_three_screens_per_kind() {
        let table = route_table();
        assert_eq!(table.len(), 1 + 3 * EntityKind::iter().count());
        assert_eq!(table[0].route, Route::Home);
        assert!(!table[0].header.show_back);
    }

    #[test]
    fn resolve_by_name() {
        let route = Route::resolve("purchase-receive/detail").unwrap();
        assert_eq!(route, Route::detail(EntityKind::PurchaseReceive));
        assert_eq!(route.header().title, "Purchase receive");

        let form = Route::resolve("warehouse/form").unwrap();
        assert_eq!(form.header().title, "Warehouse form");

        let err = Route::resolve("invoice/list").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn back_never_pops_root() {
        let nav = Navigator::new();
        nav.navigate(NavEntry::new(Route::list(EntityKind::Staff)));
        nav.navigate(NavEntry::new(Route::detail(EntityKind::Staff)).param("id", "3"));
        assert_eq!(nav.current().params["id"], "3");

        assert!(nav.back());
        assert_eq!(nav.current().route, Route::list(EntityKind::Staff));
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.depth(), 1);
        assert_eq!(nav.current().route, Route::Home);
    }
}
