//! Parsing gene column labels into Ensembl gene identifiers.

/// The recognized gene identifier prefix. Case-sensitive.
pub const ENSEMBL_GENE_PREFIX: &str = "ENSG";

/// Parse each gene label into a lookup-ready identifier, preserving order.
///
/// A label is used as-is when it already starts with `ENSG`. Otherwise the
/// substring between the first `(` and the first `)` is extracted, provided
/// the `)` comes after the `(` and the four characters following the `(`
/// are `ENSG`. Anything else yields `None`; unparseable labels are expected
/// and never an error.
pub fn extract_gene_ids(labels: &[String]) -> Vec<Option<String>> {
    labels.iter().map(|label| extract_one(label)).collect()
}

fn extract_one(label: &str) -> Option<String> {
    if label.starts_with(ENSEMBL_GENE_PREFIX) {
        return Some(label.to_string());
    }
    let open = label.find('(')?;
    let close = label.find(')')?;
    if close <= open {
        return None;
    }
    let inner = &label[open + 1..close];
    if inner.starts_with(ENSEMBL_GENE_PREFIX) {
        Some(inner.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn extract(label: &str) -> Option<String> {
        extract_one(label)
    }

    #[test]
    fn bare_ensembl_id_is_used_as_is() {
        assert_eq!(extract("ENSG00000141510"), Some("ENSG00000141510".into()));
    }

    #[test]
    fn parenthesized_id_is_extracted() {
        assert_eq!(extract("TP53(ENSG00000141510)"), Some("ENSG00000141510".into()));
        assert_eq!(extract("GENE1(ENSG001)"), Some("ENSG001".into()));
    }

    #[test]
    fn unparseable_labels_yield_none() {
        assert_eq!(extract("bad_label"), None);
        assert_eq!(extract("TP53(NM_000546)"), None);
        assert_eq!(extract("TP53(ENSG001"), None);
        assert_eq!(extract("TP53 ENSG001)"), None);
        // `)` before `(` is not a parenthesized id.
        assert_eq!(extract(")x(ENSG001"), None);
        // lower case prefix does not match
        assert_eq!(extract("tp53(ensg001)"), None);
    }

    #[test]
    fn extraction_preserves_order_and_length() {
        let labels: Vec<String> = ["GENE1(ENSG001)", "bad", "ENSG002"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ids = extract_gene_ids(&labels);
        assert_eq!(
            ids,
            vec![Some("ENSG001".to_string()), None, Some("ENSG002".to_string())]
        );
    }
}
