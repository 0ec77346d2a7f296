//! Folio (document number) derivation.
//!
//! A folio is `{PREFIX}{DD}{MM}{YY}C{seq}` where `seq` restarts at 1 each
//! calendar day and is not zero-padded. Uniqueness is enforced by the
//! unique index on `quotes.folio` plus bounded retry in the creation path.

use chrono::NaiveDate;

/// Date-scoped prefix shared by every folio issued on `date`,
/// e.g. `BHL070425` for 2025-04-07.
pub fn folio_prefix(prefix: &str, date: NaiveDate) -> String {
    format!("{}{}", prefix, date.format("%d%m%y"))
}

/// Renders a folio from its date prefix and sequence number.
pub fn format_folio(date_prefix: &str, sequence: u32) -> String {
    format!("{}C{}", date_prefix, sequence)
}

/// Extracts the full numeric suffix after the `C` separator.
/// Returns `None` for folios that do not carry a parsable sequence.
pub fn parse_sequence(folio: &str) -> Option<u32> {
    let (_, suffix) = folio.rsplit_once('C')?;
    suffix.parse().ok()
}

/// Next sequence number given the folios already issued for the day.
///
/// `seq` is not zero-padded, so `C10` sorts lexicographically below `C9`;
/// the maximum must be taken numerically over the parsed suffixes, never
/// from a lexicographic `ORDER BY folio DESC`.
pub fn next_sequence<'a, I>(existing: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(parse_sequence)
        .max()
        .map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn april_7_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 7).unwrap()
    }

    #[test]
    fn prefix_embeds_day_month_two_digit_year() {
        assert_eq!(folio_prefix("BHL", april_7_2025()), "BHL070425");
        assert_eq!(
            folio_prefix("BHL", NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()),
            "BHL311226"
        );
    }

    #[test]
    fn first_folio_of_the_day_is_sequence_one() {
        let prefix = folio_prefix("BHL", april_7_2025());
        assert_eq!(next_sequence([]), 1);
        assert_eq!(format_folio(&prefix, 1), "BHL070425C1");
    }

    #[test]
    fn sequence_parses_the_full_numeric_suffix() {
        assert_eq!(parse_sequence("BHL070425C1"), Some(1));
        assert_eq!(parse_sequence("BHL070425C10"), Some(10));
        assert_eq!(parse_sequence("BHL070425C137"), Some(137));
        assert_eq!(parse_sequence("BHL070425"), None);
        assert_eq!(parse_sequence("BHL070425Cxyz"), None);
    }

    #[test]
    fn tenth_folio_is_c10_not_a_truncated_parse() {
        let folios: Vec<String> = (1..=9).map(|n| format!("BHL070425C{}", n)).collect();
        let seq = next_sequence(folios.iter().map(String::as_str));
        assert_eq!(seq, 10);
        assert_eq!(format_folio("BHL070425", seq), "BHL070425C10");
    }

    #[test]
    fn numeric_max_wins_over_lexicographic_order() {
        // "C9" > "C10" as strings; the allocator must still continue at 11.
        let folios = ["BHL070425C9", "BHL070425C10"];
        assert_eq!(next_sequence(folios), 11);
    }

    #[test]
    fn unparsable_folios_are_ignored() {
        let folios = ["BHL070425C2", "BHL070425Cdraft"];
        assert_eq!(next_sequence(folios), 3);
    }
}
