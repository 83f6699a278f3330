//! # Filter expiry
//!
//! The bitmap key carries a TTL that each insert re-arms; once it lapses
//! the filter is empty again.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use redbloom::{InMemoryBitStore, RemoteBloomFilter};

    use crate::fixtures::TOPIC;

    fn filter(store: Arc<InMemoryBitStore>) -> RemoteBloomFilter<InMemoryBitStore> {
        RemoteBloomFilter::new(store, 3000, 0.03).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_forgets_after_ttl() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = filter(store.clone());

        filter.insert_str(TOPIC, "76930242", 60).await.unwrap();
        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(filter.may_exist_str(TOPIC, "76930242").await.unwrap());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!filter.may_exist_str(TOPIC, "76930242").await.unwrap());
        assert_eq!(store.key_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_do_not_renew_ttl() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = filter(store.clone());

        filter.insert_str(TOPIC, "a", 30).await.unwrap();
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(5)).await;
            assert!(filter.may_exist_str(TOPIC, "a").await.unwrap());
        }

        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(!filter.may_exist_str(TOPIC, "a").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_insert_sets_ttl() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = filter(store.clone());
        let key = filter.bitmap_key(TOPIC);

        filter.insert_str(TOPIC, "a", 3600).await.unwrap();
        filter.insert_str(TOPIC, "b", 10).await.unwrap();

        // The shorter TTL wins: EXPIRE overwrites
        assert_eq!(store.ttl(&key), Some(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_filter_restarts_empty() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = filter(store.clone());
        let key = filter.bitmap_key(TOPIC);

        filter.insert_str(TOPIC, "old", 10).await.unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        filter.insert_str(TOPIC, "new", 10).await.unwrap();

        assert_eq!(store.bits_set(&key), 5);
        assert!(filter.may_exist_str(TOPIC, "new").await.unwrap());
    }
}
