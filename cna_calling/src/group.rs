//! Flattening call matrices into events and grouping contiguous blocks.

use cna_types::{CnaBlock, CnaEvent, CnaLabel, CnaReport, GeneAnnotation};
use itertools::Itertools;
use ndarray::Array2;

/// Convert the gain/loss call matrices into flat event tables and group the
/// events into contiguous per-cell blocks.
///
/// `order` maps each call-matrix column back to the gene's original index
/// in the annotation table (the sort order returned by the smoother), so
/// events carry the coordinates of the gene actually called.
///
/// Events are flattened in row-major order (cell ascending, then gene) and
/// grouped after a stable sort by (cell, chrom string, start): a new block
/// starts on the first event, on a cell or chromosome change, or when an
/// event's start does not equal the previous event's end.
pub fn group_cnas(
    annotations: &[GeneAnnotation],
    order: &[usize],
    gains: &Array2<bool>,
    losses: &Array2<bool>,
) -> CnaReport {
    let gain_events = flatten_calls(annotations, order, gains, CnaLabel::Gain);
    let loss_events = flatten_calls(annotations, order, losses, CnaLabel::Loss);
    CnaReport {
        gain_blocks: group_events(&gain_events),
        loss_blocks: group_events(&loss_events),
        gain_events,
        loss_events,
    }
}

fn flatten_calls(
    annotations: &[GeneAnnotation],
    order: &[usize],
    calls: &Array2<bool>,
    label: CnaLabel,
) -> Vec<CnaEvent> {
    let mut events = Vec::new();
    for ((cell, column), &called) in calls.indexed_iter() {
        if !called {
            continue;
        }
        let gene = order[column];
        let Some(span) = annotations[gene].span() else {
            continue;
        };
        events.push(CnaEvent {
            cell,
            gene,
            chrom: span.chrom,
            start: span.start,
            end: span.end,
            label,
        });
    }
    events
}

fn group_events(events: &[CnaEvent]) -> Vec<CnaBlock> {
    let mut blocks: Vec<CnaBlock> = Vec::new();
    let mut prev: Option<&CnaEvent> = None;
    for event in events
        .iter()
        .sorted_by(|a, b| (a.cell, &a.chrom, a.start).cmp(&(b.cell, &b.chrom, b.start)))
    {
        let contiguous = prev
            .is_some_and(|p| p.cell == event.cell && p.chrom == event.chrom && p.end == event.start);
        if contiguous {
            if let Some(block) = blocks.last_mut() {
                block.events.push(event.clone());
            }
        } else {
            blocks.push(CnaBlock {
                events: vec![event.clone()],
            });
        }
        prev = Some(event);
    }
    blocks
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr2;
    use pretty_assertions::assert_eq;

    fn resolved(chrom: &str, start: i64, end: i64) -> GeneAnnotation {
        GeneAnnotation {
            gene_id: None,
            chrom: Some(chrom.to_string()),
            start: Some(start),
            end: Some(end),
        }
    }

    fn no_calls(n_cells: usize, n_genes: usize) -> Array2<bool> {
        Array2::from_elem((n_cells, n_genes), false)
    }

    #[test]
    fn abutting_genes_form_one_block() {
        let annotations = vec![resolved("1", 100, 200), resolved("1", 200, 300)];
        let order = vec![0, 1];
        let gains = arr2(&[[true, true]]);
        let report = group_cnas(&annotations, &order, &gains, &no_calls(1, 2));
        assert_eq!(report.gain_blocks.len(), 1);
        let block = &report.gain_blocks[0];
        assert_eq!(block.len(), 2);
        assert_eq!(block.start(), Some(100));
        assert_eq!(block.end(), Some(300));
        assert_eq!(block.chrom(), Some("1"));
        assert!(report.loss_blocks.is_empty());
        assert!(report.loss_events.is_empty());
    }

    #[test]
    fn a_gap_splits_the_block() {
        let annotations = vec![resolved("1", 100, 200), resolved("1", 250, 300)];
        let order = vec![0, 1];
        let gains = arr2(&[[true, true]]);
        let report = group_cnas(&annotations, &order, &gains, &no_calls(1, 2));
        assert_eq!(report.gain_blocks.len(), 2);
        assert_eq!(report.gain_blocks[0].len(), 1);
        assert_eq!(report.gain_blocks[1].len(), 1);
    }

    #[test]
    fn cell_and_chrom_changes_split_blocks() {
        let annotations = vec![resolved("1", 100, 200), resolved("1", 200, 300)];
        let order = vec![0, 1];
        // same positions called in two different cells
        let gains = arr2(&[[true, true], [true, true]]);
        let report = group_cnas(&annotations, &order, &gains, &no_calls(2, 2));
        assert_eq!(report.gain_blocks.len(), 2);
        assert_eq!(report.gain_blocks[0].cell(), Some(0));
        assert_eq!(report.gain_blocks[1].cell(), Some(1));

        // abutting coordinates on different chromosomes never merge
        let annotations = vec![resolved("1", 100, 200), resolved("2", 200, 300)];
        let gains = arr2(&[[true, true]]);
        let report = group_cnas(&annotations, &order, &gains, &no_calls(1, 2));
        assert_eq!(report.gain_blocks.len(), 2);
    }

    #[test]
    fn events_carry_original_gene_indices() {
        // annotation row 2 sorts ahead of row 0; call matrix column 0 is
        // therefore gene 2.
        let annotations = vec![
            resolved("1", 500, 600),
            GeneAnnotation::default(),
            resolved("1", 100, 200),
        ];
        let order = vec![2, 0];
        let losses = arr2(&[[true, false]]);
        let report = group_cnas(&annotations, &order, &no_calls(1, 2), &losses);
        assert_eq!(report.loss_events.len(), 1);
        let event = &report.loss_events[0];
        assert_eq!(event.gene, 2);
        assert_eq!(event.start, 100);
        assert_eq!(event.label, CnaLabel::Loss);
    }

    #[test]
    fn grouping_sorts_by_cell_then_chrom_then_start() {
        let annotations = vec![
            resolved("2", 100, 200),
            resolved("1", 200, 300),
            resolved("1", 100, 200),
        ];
        // columns already position-sorted: ("1",100), ("1",200), ("2",100)
        let order = vec![2, 1, 0];
        let gains = arr2(&[[true, true, true]]);
        let report = group_cnas(&annotations, &order, &gains, &no_calls(1, 3));
        // chr1 100-300 merges; chr2 starts fresh
        assert_eq!(report.gain_blocks.len(), 2);
        assert_eq!(report.gain_blocks[0].len(), 2);
        assert_eq!(report.gain_blocks[0].chrom(), Some("1"));
        assert_eq!(report.gain_blocks[1].chrom(), Some("2"));
    }

    #[test]
    fn empty_calls_yield_an_empty_report() {
        let annotations = vec![resolved("1", 100, 200)];
        let report = group_cnas(&annotations, &[0], &no_calls(3, 1), &no_calls(3, 1));
        assert_eq!(report, CnaReport::default());
    }
}
