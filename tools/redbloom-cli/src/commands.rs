//! Subcommand implementations, written against any `BitStore` so they run
//! the same over Redis and the in-memory store.

use std::io::Write;

use anyhow::{Context, Result};

use redbloom::domain::DEFAULT_TTL_SECS;
use redbloom::{BitStore, BloomFilterApi, RemoteBloomFilter};

/// Filter shared by the demo scenario
pub const DEMO_FILTER: &str = "topic_read:8839540:20190609";

/// Elements the demo inserts
pub const DEMO_INSERTS: std::ops::RangeInclusive<u64> = 76_930_242..=76_930_246;

/// Elements the demo queries: two inserted, two never seen
pub const DEMO_QUERIES: [u64; 4] = [76_930_242, 76_930_298, 76_930_246, 76_930_248];

pub fn params<S: BitStore + 'static>(
    filter: &RemoteBloomFilter<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let params = filter.parameters();
    if json {
        let body = serde_json::to_string_pretty(params).context("Failed to encode parameters")?;
        writeln!(out, "{body}")?;
    } else {
        writeln!(out, "expected_elements: {}", params.expected_elements())?;
        writeln!(out, "false_positive_probability: {}", params.false_positive_probability())?;
        writeln!(out, "bitmap_length: {}", params.bitmap_length())?;
        writeln!(out, "hash_functions: {}", params.hash_functions())?;
        writeln!(
            out,
            "estimated_false_positive_rate: {:.6}",
            params.estimated_false_positive_rate()
        )?;
    }
    Ok(())
}

pub async fn insert<S: BitStore + 'static>(
    filter: &RemoteBloomFilter<S>,
    name: &str,
    elements: &[String],
    ttl_secs: u64,
    out: &mut impl Write,
) -> Result<()> {
    for element in elements {
        filter
            .insert_str(name, element, ttl_secs)
            .await
            .with_context(|| format!("Failed to insert {element:?} into {name:?}"))?;
    }
    writeln!(
        out,
        "inserted {} element(s) into {} (ttl {ttl_secs}s)",
        elements.len(),
        filter.bitmap_key(name)
    )?;
    Ok(())
}

pub async fn check<S: BitStore + 'static>(
    filter: &RemoteBloomFilter<S>,
    name: &str,
    elements: &[String],
    out: &mut impl Write,
) -> Result<()> {
    for element in elements {
        let found = filter
            .may_exist_str(name, element)
            .await
            .with_context(|| format!("Failed to check {element:?} in {name:?}"))?;
        writeln!(out, "{element}: {found}")?;
    }
    Ok(())
}

/// Insert the demo elements with a one-day TTL, then query a mix of
/// inserted and unseen ones.
pub async fn demo<S: BitStore + 'static>(
    filter: &RemoteBloomFilter<S>,
    out: &mut impl Write,
) -> Result<()> {
    let inserts: Vec<String> = DEMO_INSERTS.map(|id| id.to_string()).collect();
    insert(filter, DEMO_FILTER, &inserts, DEFAULT_TTL_SECS, out).await?;

    let queries: Vec<String> = DEMO_QUERIES.iter().map(|id| id.to_string()).collect();
    check(filter, DEMO_FILTER, &queries, out).await
}
