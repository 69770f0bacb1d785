//! SEO head metadata.
//!
//! # Data Flow
//! ```text
//! current locale + LocaleLinks (switch path per locale)
//!     → head.rs
//!         hreflang alternates, language-group alternates,
//!         canonical (prefix_and_default), og:locale meta
//!     → SeoHead (JSON in the navigation context, or HTML fragments)
//! ```

pub mod head;

pub use head::{build_links, HeadLink, HeadMeta, SeoHead, SeoPage};

use crate::routing::links::LocaleLinks;

/// Head tags for the route bound to `links`; empty when SEO is disabled.
pub fn page_head(links: &LocaleLinks<'_>, base_url: &str, current_path: &str) -> SeoHead {
    let settings = links.settings();
    if !settings.options.seo {
        return SeoHead::default();
    }
    let page = SeoPage {
        current_locale: links.current_locale(),
        current_path,
        strategy: settings.strategy(),
        base_url,
    };
    build_links(&settings.registry, page, |code| links.switch_locale_path(code))
}
