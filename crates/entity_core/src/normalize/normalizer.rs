//! Normalizer contract and the default title/content normalizer.

use crate::normalize::context::NormalizeContext;
use crate::normalize::text::join_normalized;
use crate::normalize::NormalizeResult;

/// Derives search/display fields on an entity before it is committed.
///
/// `T` is usually a trait object describing the widest entity view a
/// registry works with, so one normalizer can serve several entity types.
pub trait EntityNormalizer<T: ?Sized>: Send + Sync {
    fn normalize(&self, ctx: &NormalizeContext<'_>, item: &mut T) -> NormalizeResult<()>;

    /// An exclusive normalizer replaces every non-exclusive one resolved for
    /// the same entity.
    fn is_exclusive(&self) -> bool {
        false
    }
}

/// Entities exposing source fields for normalized title and content.
pub trait Normalizable {
    /// Title sources in output order.
    fn title_sources(&self) -> Vec<Option<&str>>;

    /// Content sources in output order.
    fn content_sources(&self) -> Vec<Option<&str>>;

    fn normalized_title(&self) -> Option<&str>;

    fn normalized_content(&self) -> Option<&str>;

    fn set_normalized_title(&mut self, value: Option<String>);

    fn set_normalized_content(&mut self, value: Option<String>);
}

/// Rebuilds normalized title and content from the declared sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEntityNormalizer;

impl<T: Normalizable + ?Sized> EntityNormalizer<T> for DefaultEntityNormalizer {
    fn normalize(&self, _ctx: &NormalizeContext<'_>, item: &mut T) -> NormalizeResult<()> {
        let title = join_normalized(item.title_sources());
        let content = join_normalized(item.content_sources());
        item.set_normalized_title(title);
        item.set_normalized_content(content);
        Ok(())
    }
}
