//! Gene coordinate lookup against the Ensembl REST service.
//!
//! Gene column labels are parsed into `ENSG` identifiers, batched into POST
//! requests against the `lookup/id` endpoint, and the resulting coordinates
//! are merged back onto the expression container's annotation table. The
//! network sits behind the [`LookupTransport`] trait so the resolver can be
//! exercised with a fake transport, and behind a persistent response cache
//! so repeated runs skip the service entirely.

mod cache;
mod extract;
mod resolve;
mod transport;

pub use cache::{CachedTransport, DEFAULT_CACHE_EXPIRY};
pub use extract::{extract_gene_ids, ENSEMBL_GENE_PREFIX};
pub use resolve::{annotate_genes, resolve_annotations, LOOKUP_BATCH_SIZE};
pub use transport::{EnsemblHttpTransport, LookupRecord, LookupTransport, ENSEMBL_LOOKUP_URL};

use anyhow::Result;
use std::path::PathBuf;

/// The production transport: HTTP against the Ensembl endpoint, wrapped in
/// a persistent cache under `cache_dir` with the default 12-hour expiry.
pub fn cached_ensembl_transport(
    cache_dir: impl Into<PathBuf>,
) -> Result<CachedTransport<EnsemblHttpTransport>> {
    Ok(CachedTransport::new(
        EnsemblHttpTransport::new()?,
        cache_dir,
    ))
}
