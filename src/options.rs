use crate::image::{ImageResolver, NoFetch};
use chrono::{DateTime, FixedOffset};

static NO_FETCH: NoFetch = NoFetch;

/// Per-render configuration. Every render takes its own options; nothing is
/// read from process-wide state.
#[derive(Clone)]
pub struct RenderOptions<'a> {
    /// Turns image URLs into bytes. Defaults to [NoFetch], which refuses all
    /// URLs so those images fall back to placeholders.
    pub image_resolver: &'a dyn ImageResolver,
    /// Creation date written to the document info. [None] means "now", which
    /// makes output differ between runs.
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Stamp "Page i of n" under the border of every page
    pub page_numbers: bool,
    /// Flate-compress page content streams
    pub compress: bool,
    pub author: Option<String>,
}

impl Default for RenderOptions<'static> {
    fn default() -> Self {
        RenderOptions {
            image_resolver: &NO_FETCH,
            creation_date: None,
            page_numbers: true,
            compress: true,
            author: None,
        }
    }
}

impl<'a> RenderOptions<'a> {
    /// The same options, resolving image URLs through `resolver`
    pub fn with_resolver<'b>(self, resolver: &'b dyn ImageResolver) -> RenderOptions<'b> {
        RenderOptions {
            image_resolver: resolver,
            creation_date: self.creation_date,
            page_numbers: self.page_numbers,
            compress: self.compress,
            author: self.author,
        }
    }

    /// Pin the creation date so repeated renders are byte-identical
    pub fn with_creation_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.creation_date = Some(date);
        self
    }
}
