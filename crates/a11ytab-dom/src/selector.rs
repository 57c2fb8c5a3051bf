//! CSS selectors
//!
//! Full scraper selector grammar (combinators, attribute operators,
//! structural pseudo-classes, `:not`, `:is`, `:has`). Matching runs against
//! the document arena through `ElementNode`.

use cssparser::ParserInput;
use scraper::error::SelectorErrorKind;
use scraper::selector::{Parser, Simple};
use selectors::matching::{
    self, MatchingContext, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags, QuirksMode,
    SelectorCaches,
};
use selectors::parser::{ParseRelative, SelectorList};
use std::fmt;

use crate::element::ElementNode;
use crate::error::DomError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    list: SelectorList<Simple>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let source = input.trim();
        let mut parser_input = ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut parser_input);

        let list = SelectorList::parse(&Parser, &mut parser, ParseRelative::No).map_err(|e| {
            DomError::InvalidSelector(format!("{source}: {}", SelectorErrorKind::from(e)))
        })?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Filter `candidates` down to the elements this selector matches,
    /// keeping their order.
    pub(crate) fn filter<'a, I>(&self, candidates: I) -> Vec<ElementNode<'a>>
    where
        I: IntoIterator<Item = ElementNode<'a>>,
    {
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );

        candidates
            .into_iter()
            .filter(|element| matching::matches_selector_list(&self.list, element, &mut context))
            .collect()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
