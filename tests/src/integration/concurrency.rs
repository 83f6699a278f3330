//! # Concurrent writers and readers
//!
//! Filters hold no mutable state; all sharing happens in the store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use redbloom::{InMemoryBitStore, Metrics, RemoteBloomFilter};

    use crate::fixtures::TOPIC;

    const WORKERS: usize = 8;
    const PER_WORKER: usize = 100;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_lose_nothing() {
        let store = Arc::new(InMemoryBitStore::new());
        let metrics = Arc::new(Metrics::new());

        let mut handles = Vec::new();
        for worker in 0..WORKERS {
            // Each worker owns its own filter instance, like separate processes
            let filter = RemoteBloomFilter::new(store.clone(), 3000, 0.03)
                .unwrap()
                .with_metrics(metrics.clone());
            handles.push(tokio::spawn(async move {
                for i in 0..PER_WORKER {
                    filter
                        .insert_str(TOPIC, &format!("w{worker}-{i}"), 600)
                        .await
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let reader = RemoteBloomFilter::new(store.clone(), 3000, 0.03).unwrap();
        for worker in 0..WORKERS {
            for i in 0..PER_WORKER {
                let element = format!("w{worker}-{i}");
                assert!(reader.may_exist_str(TOPIC, &element).await.unwrap());
            }
        }
        assert_eq!(metrics.snapshot().inserts, (WORKERS * PER_WORKER) as u64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_during_writes() {
        let store = Arc::new(InMemoryBitStore::new());
        let filter = Arc::new(RemoteBloomFilter::new(store, 3000, 0.03).unwrap());

        // Seed, then keep writing while readers check the seeded elements
        for i in 0..50 {
            filter.insert_str(TOPIC, &format!("seed-{i}"), 600).await.unwrap();
        }

        let writer = {
            let filter = filter.clone();
            tokio::spawn(async move {
                for i in 0..500 {
                    filter.insert_str(TOPIC, &format!("more-{i}"), 600).await.unwrap();
                }
            })
        };
        let mut readers = Vec::new();
        for _ in 0..4 {
            let filter = filter.clone();
            readers.push(tokio::spawn(async move {
                for i in 0..50 {
                    let element = format!("seed-{i}");
                    assert!(filter.may_exist_str(TOPIC, &element).await.unwrap());
                }
            }));
        }

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
