//! Batched coordinate resolution and the annotation-table merge.

use crate::extract::extract_gene_ids;
use crate::transport::LookupTransport;
use anyhow::Result;
use cna_types::{ExpressionMatrix, GeneAnnotation};
use log::{debug, warn};
use std::collections::HashMap;

/// Identifiers are resolved in batches of this many annotation slots.
/// Unparseable slots still occupy a position but contribute no id string.
pub const LOOKUP_BATCH_SIZE: usize = 1000;

/// Resolve an ordered identifier sequence to an equal-length annotation
/// sequence.
///
/// One transport call is issued per batch. A failed call, a missing reply
/// key, or a reply missing any of chrom/start/end all yield an all-absent
/// record for the affected slots; resolution itself never fails, so the
/// pipeline completes even under total service failure.
pub fn resolve_annotations(
    ids: &[Option<String>],
    transport: &dyn LookupTransport,
) -> Vec<GeneAnnotation> {
    let mut annotations = Vec::with_capacity(ids.len());
    for batch in ids.chunks(LOOKUP_BATCH_SIZE) {
        let query: Vec<String> = batch.iter().flatten().cloned().collect();
        let records = if query.is_empty() {
            HashMap::new()
        } else {
            match transport.resolve(&query) {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        "coordinate lookup failed for a batch of {} ids: {err:#}",
                        query.len()
                    );
                    HashMap::new()
                }
            }
        };
        for id in batch {
            let mut ann = GeneAnnotation::unresolved(id.clone());
            if let Some(record) = id.as_ref().and_then(|id| records.get(id)) {
                // A record is only usable if all three fields came back.
                if let (Some(chrom), Some(start), Some(end)) =
                    (record.seq_region_name.clone(), record.start, record.end)
                {
                    ann.chrom = Some(chrom);
                    ann.start = Some(start);
                    ann.end = Some(end);
                }
            }
            annotations.push(ann);
        }
    }
    annotations
}

/// Extract identifiers from the container's gene labels, resolve them, and
/// write the result into its annotation table. The matrix itself is
/// untouched.
pub fn annotate_genes(
    matrix: &mut ExpressionMatrix,
    transport: &dyn LookupTransport,
) -> Result<()> {
    let ids = extract_gene_ids(matrix.gene_names());
    let annotations = resolve_annotations(&ids, transport);
    let resolved = annotations.iter().filter(|a| a.is_resolved()).count();
    debug!("resolved coordinates for {resolved}/{} genes", ids.len());
    matrix.set_annotations(annotations)
}
