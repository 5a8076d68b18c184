pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_bom_collapses_whitespace_and_lowercases() {
        assert_eq!(
            normalize_name("\u{feff}Katsu   Curry \u{200b}"),
            "katsu curry"
        );
        assert_eq!(normalize_name("  PAD\tTHAI  "), "pad thai");
        assert_eq!(normalize_name(""), "");
    }
}
