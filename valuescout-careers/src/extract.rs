//! Core value extraction and the values derived from it.

use crate::types::CoreValueEntry;
use std::time::Duration;
use tracing::{debug, info, warn};
use valuescout_common::Selector;
use valuescout_config::CoreValueSpec;
use valuescout_drivers::BrowserPage;

/// Total `!` characters across every headline and description.
///
/// ```
/// use valuescout_careers::{CoreValueEntry, count_exclamation_marks};
///
/// let entries = [
///     CoreValueEntry::new("Whatever it takes!", "Go!"),
///     CoreValueEntry::new("We work together.", "Yes!"),
/// ];
/// assert_eq!(count_exclamation_marks(&entries), 3);
/// ```
pub fn count_exclamation_marks(entries: &[CoreValueEntry]) -> usize {
    entries
        .iter()
        .map(|e| e.headline.matches('!').count() + e.description.matches('!').count())
        .sum()
}

/// File stem for a headline: lowercase, `!` and `.` removed, spaces as `-`,
/// no leading or trailing `-`.
pub fn slug(headline: &str) -> String {
    headline
        .replace(['!', '.'], "")
        .replace(' ', "-")
        .to_lowercase()
        .trim_matches('-')
        .to_string()
}

/// Read one entry per configured core value, in order. A field whose element
/// cannot be read takes its configured fallback; empty text is kept as read.
pub async fn extract_core_values<P>(
    page: &P,
    specs: &[CoreValueSpec],
    lookup: Duration,
) -> Vec<CoreValueEntry>
where
    P: BrowserPage + ?Sized,
{
    let mut entries = Vec::with_capacity(specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        let headline = read_or(page, &spec.headline, lookup, &spec.fallback_headline).await;
        let description =
            read_or(page, &spec.description, lookup, &spec.fallback_description).await;
        debug!(
            target: "careers.extract",
            index = idx + 1,
            total = specs.len(),
            %headline,
            "extracted core value"
        );
        entries.push(CoreValueEntry {
            headline,
            description,
        });
    }
    info!(target: "careers.extract", count = entries.len(), "core values extracted");
    entries
}

async fn read_or<P>(page: &P, selector: &Selector, lookup: Duration, fallback: &str) -> String
where
    P: BrowserPage + ?Sized,
{
    match page.inner_text(selector, lookup).await {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!(
                target: "careers.extract",
                %selector,
                error = %e,
                fallback,
                "element unreadable, using fallback"
            );
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_marks_in_both_fields() {
        let entries = vec![
            CoreValueEntry::new("Whatever it takes!", "Deliver!"),
            CoreValueEntry::new("We work together.", "Yes!"),
            CoreValueEntry::new("We make an impact.", "Real results."),
        ];
        assert_eq!(count_exclamation_marks(&entries), 3);
        assert_eq!(count_exclamation_marks(&[]), 0);
    }

    #[test]
    fn repeated_marks_all_count() {
        let entries = vec![CoreValueEntry::new("Go!!!", "!")];
        assert_eq!(count_exclamation_marks(&entries), 4);
    }

    #[test]
    fn slug_matches_image_file_names() {
        assert_eq!(slug("Whatever it takes!"), "whatever-it-takes");
        assert_eq!(slug("We work together."), "we-work-together");
        assert_eq!(slug("Passion is our fuel."), "passion-is-our-fuel");
    }

    #[test]
    fn slug_trims_dashes_from_edges() {
        assert_eq!(slug(" Hello World! "), "hello-world");
        assert_eq!(slug("!!!"), "");
    }
}
