use crate::models::FilingHistoryItem;
use serde::Deserialize;
use std::str::FromStr;

/// Accounts filings considered as fallback extraction candidates.
const MAX_ACCOUNTS_CANDIDATES: usize = 3;

/// Matching strategy for the primary insolvency filing.
///
/// Two predicates exist for "the statement-of-affairs filing" in the wild;
/// both are supported as named modes rather than guessing which is
/// authoritative. `Strict` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingMatchMode {
    /// category == "insolvency" AND description contains "statement-of-affairs".
    Strict,
    /// category == "statement-of-affairs" OR description contains "resolution".
    Broad,
}

impl FromStr for FilingMatchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(FilingMatchMode::Strict),
            "broad" => Ok(FilingMatchMode::Broad),
            _ => Err(()),
        }
    }
}

/// Candidates selected from one company's filing history.
///
/// Holds references into the history; nothing is fetched at selection time.
#[derive(Debug)]
pub struct SelectedFilings<'a> {
    /// First filing matching the insolvency predicate, if any. No match is a
    /// valid outcome and means the primary extraction pass is skipped.
    pub insolvency: Option<&'a FilingHistoryItem>,
    /// First `MAX_ACCOUNTS_CANDIDATES` "accounts" filings, in original order.
    pub accounts: Vec<&'a FilingHistoryItem>,
}

fn is_insolvency_filing(item: &FilingHistoryItem, mode: FilingMatchMode) -> bool {
    match mode {
        FilingMatchMode::Strict => {
            item.category == "insolvency" && item.description.contains("statement-of-affairs")
        }
        FilingMatchMode::Broad => {
            item.category == "statement-of-affairs" || item.description.contains("resolution")
        }
    }
}

/// Picks the single most relevant insolvency filing and up to three accounts
/// filings from a filing history.
///
/// History order is preserved: the insolvency candidate is the first match,
/// ties broken by position, and accounts candidates keep their original
/// relative order.
pub fn select_filings(
    history: &[FilingHistoryItem],
    mode: FilingMatchMode,
) -> SelectedFilings<'_> {
    let insolvency = history.iter().find(|item| is_insolvency_filing(item, mode));

    let accounts: Vec<&FilingHistoryItem> = history
        .iter()
        .filter(|item| item.category == "accounts")
        .take(MAX_ACCOUNTS_CANDIDATES)
        .collect();

    SelectedFilings {
        insolvency,
        accounts,
    }
}
