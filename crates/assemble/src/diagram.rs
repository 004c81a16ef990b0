//! Registered diagram routines.
//!
//! Graphics blocks name a drawing routine instead of carrying executable
//! script text; the registry looks the routine up and renders its markup.

use crate::error::Result;
use lectern_markup::Node;
use std::collections::HashMap;

/// One drawing routine: turns a graphics block's source text into markup.
pub trait Diagram: Send + Sync {
    fn render(&self, source: &str) -> Result<Node>;
}
impl<F> Diagram for F
where
    F: Fn(&str) -> Result<Node> + Send + Sync,
{
    fn render(&self, source: &str) -> Result<Node> {
        self(source)
    }
}

/// Name-keyed lookup of [`Diagram`] routines.
///
/// A failing or unregistered routine is logged and skipped; one broken
/// diagram never aborts the rest of page setup.
#[derive(Default)]
pub struct DiagramRegistry {
    routines: HashMap<String, Box<dyn Diagram>>,
}
impl DiagramRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, routine: impl Diagram + 'static) {
        self.routines.insert(name.into(), Box::new(routine));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routines.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    /// Render the named routine against `source`, or `None` when the
    /// routine is missing or failed.
    pub fn render(&self, name: &str, source: &str) -> Option<Node> {
        let Some(routine) = self.routines.get(name) else {
            tracing::debug!(name, "no diagram routine registered");
            return None;
        };
        match routine.render(source) {
            Ok(node) => Some(node),
            Err(error) => {
                let error = &*error;
                tracing::error!(name, %error, "error setting up diagram");
                None
            },
        }
    }
}
impl std::fmt::Debug for DiagramRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramRegistry").field("routines", &self.routines.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use lectern_markup::tags;

    fn registry() -> DiagramRegistry {
        let mut registry = DiagramRegistry::new();
        registry.register("box", |source: &str| {
            Ok(tags::div().class("diagram").child(source.trim()).into())
        });
        registry.register("broken", |_: &str| {
            exn::bail!(ErrorKind::Diagram { name: "broken".to_string() })
        });
        registry
    }

    #[test]
    fn test_renders_registered_routine() {
        let node = registry().render("box", " payload ").unwrap();
        assert_eq!(node.render(), "<div class=\"diagram\">payload</div>");
    }

    #[test]
    fn test_missing_routine_is_none() {
        assert!(registry().render("nope", "x").is_none());
    }

    #[test]
    fn test_failing_routine_is_none() {
        assert!(registry().render("broken", "x").is_none());
    }
}
