//! Fragment-based router with wildcard fallback.
//!
//! The router owns its location fragment (a terminal process has no
//! browser hash to lean on); `navigate` updates the fragment and runs the
//! change handler synchronously. Components run only after a store has
//! been injected via [`Router::init`]; they receive the store by
//! reference and read whatever state they need themselves.

use std::cell::RefCell;
use std::rc::Rc;

use crate::store::Store;

/// Fallback pattern matched when no route path equals the fragment.
pub const WILDCARD: &str = "*";

type Component = Rc<dyn Fn(&Store)>;

struct Route {
    path: String,
    component: Component,
}

struct RouterInner {
    routes: Vec<Route>,
    store: Option<Store>,
    fragment: String,
}

/// Route table plus current location. Cloning yields another handle to
/// the same router.
#[derive(Clone)]
pub struct Router {
    inner: Rc<RefCell<RouterInner>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RouterInner {
                routes: Vec::new(),
                store: None,
                fragment: String::new(),
            })),
        }
    }

    /// Append a route. No de-duplication: the first matching entry wins.
    /// Paths match exactly; the only pattern is the [`WILDCARD`]
    /// fallback. No path parameters.
    pub fn add_route(&self, path: &str, component: impl Fn(&Store) + 'static) {
        self.inner.borrow_mut().routes.push(Route {
            path: path.to_string(),
            component: Rc::new(component),
        });
    }

    /// Inject the store and dispatch the current route (initial paint).
    pub fn init(&self, store: Store) {
        self.inner.borrow_mut().store = Some(store);
        self.handle_route_change();
    }

    /// Set the location fragment and run the change handler. A leading
    /// `#` is stripped; an empty fragment reads as `/`.
    pub fn navigate(&self, path: &str) {
        let fragment = path.strip_prefix('#').unwrap_or(path);
        self.inner.borrow_mut().fragment = fragment.to_string();
        self.handle_route_change();
    }

    /// Current path: the fragment, defaulting to `/` when empty.
    pub fn current_path(&self) -> String {
        let inner = self.inner.borrow();
        if inner.fragment.is_empty() {
            "/".to_string()
        } else {
            inner.fragment.clone()
        }
    }

    fn handle_route_change(&self) {
        // Resolve under the borrow, invoke outside it: the component may
        // navigate again or add routes.
        let resolved = {
            let inner = self.inner.borrow();
            let path = if inner.fragment.is_empty() {
                "/"
            } else {
                inner.fragment.as_str()
            };
            let route = inner
                .routes
                .iter()
                .find(|r| r.path == path)
                .or_else(|| inner.routes.iter().find(|r| r.path == WILDCARD));
            match (route, &inner.store) {
                (Some(route), Some(store)) => Some((route.component.clone(), store.clone())),
                _ => None,
            }
        };
        if let Some((component, store)) = resolved {
            component(&store);
        }
    }
}
