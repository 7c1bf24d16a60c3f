//! High-level page API for the Wombat document engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Resource Loading** - documents and linked style sheets from the
//!   network or the filesystem, behind the [`ResourceLoader`] trait
//! - **Page Pipeline** - parse, collect style sheets, cascade, lay out and
//!   paint in one call
//! - **Font Metrics** - glyph advances and line metrics from system fonts
//! - **Software Rendering** - headless screenshots of a display list
//!
//! # Not Implemented
//!
//! - Windows, event loops and input handling
//! - Images, scripts and any subresource other than style sheets

pub mod font_metrics;
pub mod loader;
pub mod renderer;

pub use wombat_css as css;
pub use wombat_dom as dom;
pub use wombat_html as html;

pub use font_metrics::{FontdueFontMetrics, SystemFonts, load_font_metrics};
pub use loader::{LoadError, NetLoader, ResourceLoader};
pub use renderer::{Renderer, parse_color};

use wombat_common::url::{resolve_url, split_fragment};
use wombat_common::warning::clear_warnings;
use wombat_css::{
    DisplayList, FontCache, LayoutTree, PaintOptions, Painter, Rule, Viewport, collect_rules,
    compute_styles,
};
use wombat_dom::DomTree;
use wombat_html::{HTMLParser, HTMLTokenizer, ParseIssue};

/// A loaded, styled, laid out and painted document.
pub struct Page {
    url: Option<String>,
    fragment: Option<String>,
    dom: DomTree,
    issues: Vec<ParseIssue>,
    rules: Vec<Rule>,
    viewport: Viewport,
    options: PaintOptions,
    layout: LayoutTree,
    display_list: DisplayList,
}

impl Page {
    /// Fetch the document at `url` and build a page from it.
    ///
    /// A `#fragment` is not sent to the loader; it is kept as the page's
    /// [`fragment`](Self::fragment) and picked up by
    /// [`initial_scroll`](Self::initial_scroll).
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the document itself cannot be fetched.
    /// Linked style sheets that fail to load are reported and skipped.
    pub fn load(
        url: &str,
        loader: &dyn ResourceLoader,
        fonts: &mut FontCache<'_>,
        viewport: Viewport,
    ) -> Result<Self, LoadError> {
        let (resource, fragment) = split_fragment(url);
        let html = loader.fetch(resource)?;
        let mut page = Self::from_html(&html, Some(resource), loader, fonts, viewport);
        page.fragment = fragment.map(str::to_string);
        Ok(page)
    }

    /// Build a page from markup. Relative `href`s are resolved against
    /// `base_url` before they are handed to `loader`.
    #[must_use]
    pub fn from_html(
        html: &str,
        base_url: Option<&str>,
        loader: &dyn ResourceLoader,
        fonts: &mut FontCache<'_>,
        viewport: Viewport,
    ) -> Self {
        clear_warnings();

        // STEP 1: Parse.
        let tokens = HTMLTokenizer::tokenize(html);
        let (mut dom, issues) = HTMLParser::new(tokens).run_with_issues();

        // STEP 2: Gather the user-agent, linked and embedded style sheets.
        let rules = collect_rules(&dom, |href| loader.fetch(&resolve_url(href, base_url)));

        // STEP 3: Cascade.
        compute_styles(&mut dom, &rules);

        // STEP 4: Lay out and paint.
        let options = PaintOptions::default();
        let layout = LayoutTree::layout(&dom, &viewport, fonts);
        let display_list = Painter::new(&dom, &viewport, options).paint(&layout);

        Self {
            url: base_url.map(str::to_string),
            fragment: None,
            dom,
            issues,
            rules,
            viewport,
            options,
            layout,
            display_list,
        }
    }

    /// Lay the page out again for a new viewport width.
    pub fn resize(&mut self, width: f32, fonts: &mut FontCache<'_>) {
        self.viewport.width = width;
        self.layout = LayoutTree::layout(&self.dom, &self.viewport, fonts);
        self.repaint();
    }

    /// Change the paint options and repaint.
    pub fn set_paint_options(&mut self, options: PaintOptions) {
        self.options = options;
        self.repaint();
    }

    fn repaint(&mut self) {
        self.display_list = Painter::new(&self.dom, &self.viewport, self.options).paint(&self.layout);
    }

    /// Vertical offset that brings the element with `id` == `fragment` into
    /// view. A leading `#` is ignored.
    #[must_use]
    pub fn scroll_to_fragment(&self, fragment: &str) -> Option<f32> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        self.layout.scroll_target(&self.dom, fragment)
    }

    /// Where the page starts scrolled: at the element named by the URL
    /// fragment, or the top when there is none or it names nothing.
    #[must_use]
    pub fn initial_scroll(&self) -> f32 {
        self.fragment
            .as_deref()
            .and_then(|fragment| self.scroll_to_fragment(fragment))
            .unwrap_or(0.0)
    }

    /// The link under a point in page coordinates, resolved against the
    /// page URL.
    #[must_use]
    pub fn link_at(&self, x: f32, y: f32) -> Option<String> {
        self.layout
            .link_at(&self.dom, x, y)
            .map(|href| resolve_url(href, self.url.as_deref()))
    }

    /// Linked style sheet URLs in document order, resolved against the
    /// page URL.
    #[must_use]
    pub fn stylesheet_links(&self) -> Vec<String> {
        wombat_css::stylesheet_links(&self.dom)
            .iter()
            .map(|href| resolve_url(href, self.url.as_deref()))
            .collect()
    }

    /// The page URL without its fragment, if it was loaded from one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The `#fragment` of the URL the page was loaded from, without the `#`.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The styled DOM.
    #[must_use]
    pub const fn dom(&self) -> &DomTree {
        &self.dom
    }

    /// Anomalies the HTML parser recovered from.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Every rule that took part in the cascade, user-agent rules first.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The viewport the page is laid out for.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The box tree.
    #[must_use]
    pub const fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    /// The draw commands.
    #[must_use]
    pub const fn display_list(&self) -> &DisplayList {
        &self.display_list
    }

    /// Total height of the laid out document.
    #[must_use]
    pub fn document_height(&self) -> f32 {
        self.layout.document_height()
    }
}
