// src/services/metadata.rs

//! Per-route head metadata.
//!
//! Protected route subtrees declare a [`RouteMetadataDescriptor`] once at
//! startup; every request resolves its path against them and renders the
//! matching `<title>`, description and robots meta tags.

use quick_xml::escape::escape;

use crate::models::{MetadataConfig, RobotsDirective, RouteMetadataDescriptor, is_within};

/// Descriptor lookup for the rendering layer.
#[derive(Debug, Clone)]
pub struct MetadataRegistry {
    fallback: RouteMetadataDescriptor,
    protected: Vec<RouteMetadataDescriptor>,
}

impl MetadataRegistry {
    pub fn new(config: &MetadataConfig) -> Self {
        let fallback = RouteMetadataDescriptor {
            route: "/".to_string(),
            title: config.default_title.clone(),
            description: config.default_description.clone(),
            robots: RobotsDirective::indexable(),
        };

        Self {
            fallback,
            protected: config.protected.clone(),
        }
    }

    /// Descriptor declared for exactly this route, if any.
    pub fn descriptor(&self, route: &str) -> Option<&RouteMetadataDescriptor> {
        self.protected.iter().find(|d| d.route == route)
    }

    /// Descriptor that applies to a request path.
    ///
    /// The deepest protected subtree containing `path` wins; anything outside
    /// every subtree gets the indexable site default.
    pub fn resolve(&self, path: &str) -> &RouteMetadataDescriptor {
        let path = path.split(['?', '#']).next().unwrap_or(path);

        self.protected
            .iter()
            .filter(|d| is_within(path, &d.route))
            .max_by_key(|d| d.route.trim_end_matches('/').len())
            .unwrap_or(&self.fallback)
    }

    /// All protected descriptors, in declaration order.
    pub fn protected(&self) -> &[RouteMetadataDescriptor] {
        &self.protected
    }

    /// Resolve and render in one step.
    pub fn render_for(&self, path: &str) -> String {
        render_head(self.resolve(path))
    }
}

/// Render a descriptor as `<head>` tags.
pub fn render_head(descriptor: &RouteMetadataDescriptor) -> String {
    format!(
        "<title>{}</title>\n<meta name=\"description\" content=\"{}\">\n<meta name=\"robots\" content=\"{}\">\n",
        escape(descriptor.title.as_str()),
        escape(descriptor.description.as_str()),
        escape(descriptor.robots.content().as_str()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn registry() -> MetadataRegistry {
        MetadataRegistry::new(&MetadataConfig::default())
    }

    fn meta_content(head: &str, name: &str) -> Option<String> {
        let fragment = Html::parse_fragment(head);
        let selector = Selector::parse(&format!("meta[name=\"{name}\"]")).unwrap();
        fragment
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::to_string)
    }

    #[test]
    fn test_three_protected_descriptors_suppress_everything() {
        let registry = registry();
        assert_eq!(registry.protected().len(), 3);
        for descriptor in registry.protected() {
            assert!(descriptor.robots.is_suppress_all(), "{}", descriptor.route);
        }
    }

    #[test]
    fn test_resolve_subtree() {
        let registry = registry();
        assert_eq!(registry.resolve("/panel/bookings").route, "/panel/bookings");
        assert_eq!(registry.resolve("/panel/bookings/42").route, "/panel/bookings");
        assert_eq!(registry.resolve("/panel/settings?tab=hours").route, "/panel/settings");
    }

    #[test]
    fn test_resolve_outside_subtrees_is_indexable() {
        let registry = registry();
        for path in ["/", "/agenda", "/panel/bookingsx"] {
            let descriptor = registry.resolve(path);
            assert_eq!(descriptor.route, "/");
            assert!(descriptor.robots.index);
            assert!(descriptor.robots.follow);
        }
    }

    #[test]
    fn test_exact_descriptor_lookup() {
        let registry = registry();
        assert!(registry.descriptor("/panel/services").is_some());
        assert!(registry.descriptor("/panel/services/new").is_none());
    }

    #[test]
    fn test_render_head_tags() {
        let head = registry().render_for("/panel/services");
        let fragment = Html::parse_fragment(&head);
        let title = Selector::parse("title").unwrap();
        assert_eq!(
            fragment.select(&title).next().unwrap().inner_html(),
            "Services | Panel"
        );
        assert_eq!(
            meta_content(&head, "robots").as_deref(),
            Some("noindex, nofollow, noarchive, nosnippet, noimageindex, nocache")
        );
        assert_eq!(
            meta_content(&head, "description").as_deref(),
            Some("Manage the services offered for booking.")
        );
    }

    #[test]
    fn test_render_head_escapes_text() {
        let descriptor = RouteMetadataDescriptor {
            route: "/x".to_string(),
            title: "A <b> & \"c\"".to_string(),
            description: "say \"hi\"".to_string(),
            robots: RobotsDirective::indexable(),
        };
        let head = render_head(&descriptor);
        assert!(head.contains("<title>A &lt;b&gt; &amp; &quot;c&quot;</title>"));
        assert_eq!(meta_content(&head, "description").as_deref(), Some("say \"hi\""));
    }
}
