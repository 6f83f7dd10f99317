// src/services/sitemap.rs

//! Sitemap generator.
//!
//! Lists the public, indexable routes as absolute URLs and writes them as a
//! sitemaps.org `urlset` document. `lastmod` comes from an injected [`Clock`]
//! that is read once per generation.

use std::sync::Arc;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{AppError, Result};
use crate::models::{ChangeFrequency, Priority, SiteUrl, SitemapConfig, SitemapEntry};
use crate::services::clock::Clock;

/// Namespace of the sitemap protocol schema.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// A configured sitemap route with its priority already range-checked.
#[derive(Debug, Clone)]
struct RouteSpec {
    path: String,
    change_frequency: ChangeFrequency,
    priority: Priority,
}

/// Builds the sitemap for one deployment.
#[derive(Clone)]
pub struct SitemapGenerator {
    base: SiteUrl,
    routes: Vec<RouteSpec>,
    clock: Arc<dyn Clock>,
}

impl SitemapGenerator {
    pub fn new(base: &SiteUrl, config: &SitemapConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let routes = config
            .routes
            .iter()
            .map(|route| -> Result<RouteSpec> {
                Ok(RouteSpec {
                    path: route.path.clone(),
                    change_frequency: route.change_frequency,
                    priority: Priority::new(route.priority)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            base: base.clone(),
            routes,
            clock,
        })
    }

    /// Route paths in sitemap order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.path.as_str())
    }

    /// Produce the entries, all stamped with a single clock reading.
    pub fn generate(&self) -> Vec<SitemapEntry> {
        let now = self.clock.now();

        self.routes
            .iter()
            .map(|route| SitemapEntry {
                url: self.base.join(&route.path),
                last_modified: now,
                change_frequency: route.change_frequency,
                priority: route.priority,
            })
            .collect()
    }

    /// Generate and serialize in one step.
    pub fn render(&self) -> Result<String> {
        render_xml(&self.generate())
    }
}

/// Serialize entries as a sitemap protocol `urlset` document.
pub fn render_xml(entries: &[SitemapEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(AppError::xml)?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NS));
    writer
        .write_event(Event::Start(urlset))
        .map_err(AppError::xml)?;

    for entry in entries {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(AppError::xml)?;
        write_text_element(&mut writer, "loc", &entry.url)?;
        write_text_element(&mut writer, "lastmod", &entry.lastmod())?;
        write_text_element(&mut writer, "changefreq", entry.change_frequency.as_str())?;
        write_text_element(&mut writer, "priority", &entry.priority.to_string())?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(AppError::xml)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(AppError::xml)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(AppError::xml)?;
    xml.push('\n');
    Ok(xml)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(AppError::xml)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(AppError::xml)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(AppError::xml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SitemapRoute;
    use crate::services::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use quick_xml::Reader;

    fn fixed_generator(base: &str) -> SitemapGenerator {
        let base = SiteUrl::parse(base).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
        SitemapGenerator::new(&base, &SitemapConfig::default(), Arc::new(clock)).unwrap()
    }

    /// Parse a urlset document, returning (loc, lastmod, changefreq, priority) per url.
    fn parse_urlset(xml: &str) -> Vec<(String, String, String, String)> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        let mut saw_namespace = false;
        let mut current_tag = String::new();
        let mut current = (String::new(), String::new(), String::new(), String::new());
        let mut urls = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if name == "urlset" {
                        saw_namespace = e.attributes().flatten().any(|attr| {
                            attr.key.as_ref() == b"xmlns"
                                && attr.value.as_ref() == SITEMAP_NS.as_bytes()
                        });
                    }
                    current_tag = name;
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().unwrap().to_string();
                    match current_tag.as_str() {
                        "loc" => current.0 = text,
                        "lastmod" => current.1 = text,
                        "changefreq" => current.2 = text,
                        "priority" => current.3 = text,
                        other => panic!("unexpected text inside <{other}>"),
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"url" {
                        urls.push(std::mem::take(&mut current));
                    }
                    current_tag.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("sitemap is not well-formed: {e}"),
                _ => {}
            }
            buf.clear();
        }

        assert!(saw_namespace, "urlset must declare the sitemap namespace");
        urls
    }

    #[test]
    fn test_two_entry_scenario() {
        let entries = fixed_generator("https://example.test").generate();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://example.test");
        assert_eq!(entries[0].priority.value(), 1.0);
        assert_eq!(entries[0].change_frequency, ChangeFrequency::Weekly);
        assert_eq!(entries[1].url, "https://example.test/agenda");
        assert_eq!(entries[1].priority.value(), 0.8);
        assert_eq!(entries[1].change_frequency, ChangeFrequency::Daily);
    }

    #[test]
    fn test_single_clock_reading_for_all_entries() {
        let entries = fixed_generator("https://example.test").generate();
        assert!(entries.iter().all(|e| e.last_modified == entries[0].last_modified));
    }

    #[test]
    fn test_render_is_deterministic_with_fixed_clock() {
        let generator = fixed_generator("https://example.test");
        assert_eq!(generator.render().unwrap(), generator.render().unwrap());
    }

    #[test]
    fn test_xml_is_well_formed_and_on_base() {
        let xml = fixed_generator("https://example.test").render().unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

        let urls = parse_urlset(&xml);
        assert_eq!(urls.len(), 2);
        for (loc, lastmod, _, _) in &urls {
            assert!(loc.starts_with("https://example.test"));
            assert_eq!(lastmod, "2026-03-01T12:00:00Z");
        }
        assert_eq!(urls[0].2, "weekly");
        assert_eq!(urls[0].3, "1.0");
        assert_eq!(urls[1].0, "https://example.test/agenda");
        assert_eq!(urls[1].2, "daily");
        assert_eq!(urls[1].3, "0.8");
    }

    #[test]
    fn test_loc_text_is_escaped() {
        let base = SiteUrl::parse("https://example.test").unwrap();
        let config = SitemapConfig {
            routes: vec![SitemapRoute {
                path: "/search?a=1&b=2".to_string(),
                change_frequency: ChangeFrequency::Never,
                priority: 0.1,
            }],
            base_url: None,
        };
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        let generator = SitemapGenerator::new(&base, &config, Arc::new(clock)).unwrap();

        let xml = generator.render().unwrap();
        assert!(xml.contains("a=1&amp;b=2"));
        assert_eq!(parse_urlset(&xml)[0].0, "https://example.test/search?a=1&b=2");
    }

    #[test]
    fn test_priority_out_of_range_is_rejected() {
        let base = SiteUrl::parse("https://example.test").unwrap();
        let mut config = SitemapConfig::default();
        config.routes[0].priority = 1.2;
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
        assert!(SitemapGenerator::new(&base, &config, Arc::new(clock)).is_err());
    }

    #[test]
    fn test_priorities_within_bounds() {
        for entry in fixed_generator("https://example.test").generate() {
            let p = entry.priority.value();
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_fractional_priorities_are_not_rounded() {
        let base = SiteUrl::parse("https://example.test").unwrap();
        let mut config = SitemapConfig::default();
        config.routes[0].priority = 0.25;
        config.routes[1].priority = 0.85;
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());

        let generator = SitemapGenerator::new(&base, &config, Arc::new(clock)).unwrap();
        let urls = parse_urlset(&generator.render().unwrap());
        assert_eq!(urls[0].3, "0.25");
        assert_eq!(urls[1].3, "0.85");
    }
}
