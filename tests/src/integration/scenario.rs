//! # Topic-read deduplication flow
//!
//! A reader marks article ids as read in a per-topic, per-day filter and
//! later asks whether an id was already served.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use redbloom::{
        BloomConfig, BloomFilterApi, FilterError, InMemoryBitStore, MatchPolicy, RemoteBloomFilter,
    };

    use crate::fixtures::{OFFSETS_76930242, TOPIC};

    const DAY_SECS: u64 = 86_400;

    fn topic_filter(store: Arc<InMemoryBitStore>) -> RemoteBloomFilter<InMemoryBitStore> {
        RemoteBloomFilter::new(store, 3000, 0.03).unwrap()
    }

    #[tokio::test]
    async fn test_topic_read_scenario() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = topic_filter(store.clone());

        for id in 76_930_242u64..=76_930_246 {
            filter
                .insert_str(TOPIC, &id.to_string(), DAY_SECS)
                .await
                .unwrap();
        }

        assert!(filter.may_exist_str(TOPIC, "76930242").await.unwrap());
        assert!(!filter.may_exist_str(TOPIC, "76930298").await.unwrap());
        assert!(filter.may_exist_str(TOPIC, "76930246").await.unwrap());
        assert!(!filter.may_exist_str(TOPIC, "76930248").await.unwrap());

        // Five inserts plus four lookups, one round trip each
        assert_eq!(store.round_trips(), 9);
    }

    #[tokio::test]
    async fn test_bitmap_bytes_match_redis_layout() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = topic_filter(store.clone());

        filter.insert_str(TOPIC, "76930242", DAY_SECS).await.unwrap();

        let raw = store.raw_bytes(&filter.bitmap_key(TOPIC)).unwrap();
        // Highest offset 17799 lives in byte 2224
        assert_eq!(raw.len(), 2225);
        for offset in OFFSETS_76930242 {
            let byte = raw[(offset / 8) as usize];
            assert_ne!(byte & (0x80 >> (offset % 8)), 0, "offset {offset} not set");
        }
        let total: u32 = raw.iter().map(|b| b.count_ones()).sum();
        assert_eq!(total, 5);
    }

    #[tokio::test]
    async fn test_instances_share_one_bitmap() {
        // Two processes configured alike see each other's writes
        let store = Arc::new(InMemoryBitStore::new());
        let writer = topic_filter(store.clone());
        let reader = topic_filter(store.clone());

        writer.insert_str(TOPIC, "76930243", DAY_SECS).await.unwrap();

        assert!(reader.may_exist_str(TOPIC, "76930243").await.unwrap());
    }

    #[tokio::test]
    async fn test_filters_are_isolated_by_name_and_prefix() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = topic_filter(store.clone());
        let other_prefix = RemoteBloomFilter::with_config(
            store.clone(),
            BloomConfig::default().with_key_prefix("dedup:"),
        )
        .unwrap();

        filter.insert_str(TOPIC, "76930242", DAY_SECS).await.unwrap();

        assert!(!filter
            .may_exist_str("topic_read:8839540:20190610", "76930242")
            .await
            .unwrap());
        assert!(!other_prefix.may_exist_str(TOPIC, "76930242").await.unwrap());
        assert_eq!(store.key_count(), 1);
    }

    #[tokio::test]
    async fn test_policies_agree_on_inserted_elements() {
        let store = Arc::new(InMemoryBitStore::new());
        let any = topic_filter(store.clone());
        let all = RemoteBloomFilter::with_config(
            store.clone(),
            BloomConfig::default().with_match_policy(MatchPolicy::AllBitsSet),
        )
        .unwrap();

        for id in 0..200 {
            any.insert_str(TOPIC, &format!("id-{id}"), DAY_SECS)
                .await
                .unwrap();
        }
        for id in 0..200 {
            let element = format!("id-{id}");
            assert!(any.may_exist_str(TOPIC, &element).await.unwrap());
            assert!(all.may_exist_str(TOPIC, &element).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_binary_elements() {
        let filter = topic_filter(Arc::new(InMemoryBitStore::new()));
        let element = [0u8, 159, 146, 150, 255];

        filter.insert(TOPIC, &element, DAY_SECS).await.unwrap();

        assert!(filter.may_exist(TOPIC, &element).await.unwrap());
    }

    #[tokio::test]
    async fn test_bad_arguments_never_reach_the_store() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = topic_filter(store.clone());

        let results = [
            filter.insert(TOPIC, b"", DAY_SECS).await,
            filter.insert("", b"1", DAY_SECS).await,
            filter.insert(TOPIC, b"1", 0).await,
        ];
        for result in results {
            assert!(matches!(result, Err(FilterError::InvalidArgument(_))));
        }
        assert_eq!(store.round_trips(), 0);
    }

    #[tokio::test]
    async fn test_over_capacity_raises_false_positive_rate() {
        let config = BloomConfig {
            expected_elements: 1000,
            target_fpp: 0.01,
            ..BloomConfig::default()
        }
        .with_match_policy(MatchPolicy::AllBitsSet);
        let filter =
            RemoteBloomFilter::with_config(Arc::new(InMemoryBitStore::new()), config).unwrap();

        // Twice the planned capacity
        for id in 0..2000 {
            filter
                .insert_str(TOPIC, &format!("member-{id}"), DAY_SECS)
                .await
                .unwrap();
        }

        let probes = 2000;
        let mut positives = 0;
        for id in 0..probes {
            if filter
                .may_exist_str(TOPIC, &format!("probe-{id}"))
                .await
                .unwrap()
            {
                positives += 1;
            }
        }
        let rate = positives as f64 / probes as f64;
        assert!(rate > 0.01, "over-capacity rate {rate} fell below the target");
    }
}
