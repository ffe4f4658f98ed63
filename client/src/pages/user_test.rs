use super::*;

#[test]
fn tally_text_counts_both_states() {
    let days: BTreeMap<String, bool> = [("2024-03-01", true), ("2024-03-02", false), ("2024-03-03", true)]
        .into_iter()
        .map(|(d, p)| (d.to_owned(), p))
        .collect();
    assert_eq!(tally_text(&days), "2 present, 1 absent");
}

#[test]
fn tally_text_of_empty_map() {
    assert_eq!(tally_text(&BTreeMap::new()), "0 present, 0 absent");
}
