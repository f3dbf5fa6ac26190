//! End-to-end runs of submit → worker → store → get/delete over the
//! in-process backends.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};
use photobooth_core::queue::MemoryQueue;
use photobooth_core::store::MemoryStore;
use photobooth_core::{Config, PhotoSubmission, Photobooth, PhotoRecord, StoreError};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

fn submission(width: u32, height: u32, format: ImageFormat) -> String {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 251) as u8, (y % 241) as u8, 128])
    }));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    BASE64.encode(buffer.into_inner())
}

fn dims(b64: &str) -> (u32, u32) {
    let bytes = BASE64.decode(b64).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    image::load_from_memory(&bytes).unwrap().dimensions()
}

struct Harness {
    booth: Photobooth,
    queue: Arc<MemoryQueue>,
    store: Arc<MemoryStore>,
    worker: tokio::task::JoinHandle<()>,
}

impl Harness {
    fn start() -> Self {
        let mut config = Config::default();
        config.worker.restart_delay_ms = 20;
        let queue = Arc::new(MemoryQueue::new("photos"));
        let store = Arc::new(MemoryStore::new());
        let booth = Photobooth::with_backends(config, queue.clone(), store.clone());

        let supervisor = booth.supervisor();
        let worker = tokio::spawn(async move { supervisor.run().await });

        Self {
            booth,
            queue,
            store,
            worker,
        }
    }

    /// Wait until the queue is drained and `count` records exist.
    async fn settle(&self, count: usize) -> Vec<PhotoRecord> {
        tokio::time::timeout(Duration::from_secs(30), async {
            while !self.queue.is_empty() || self.store.len().await < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("pipeline did not settle");
        self.store.records().await
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[tokio::test]
async fn jpeg_submission_yields_scaled_derivatives() {
    let harness = Harness::start();
    let data = submission(1000, 800, ImageFormat::Jpeg);

    harness
        .booth
        .publisher()
        .submit(PhotoSubmission::new(data.clone()))
        .await
        .unwrap();

    let records = harness.settle(1).await;
    assert_eq!(records.len(), 1);
    let record = &records[0];

    let photos = harness.booth.photos();
    let original = photos.get_by_id(record.id, "100").await.unwrap();
    assert_eq!(original.data, data);
    assert!(!original.is_deleted);

    assert_eq!(dims(&photos.get_by_id(record.id, "75").await.unwrap().data), (750, 600));
    assert_eq!(dims(&photos.get_by_id(record.id, "50").await.unwrap().data), (500, 400));
    assert_eq!(dims(&photos.get_by_id(record.id, "25").await.unwrap().data), (250, 200));
}

#[tokio::test]
async fn rejected_messages_do_not_stop_the_worker() {
    let harness = Harness::start();
    let publisher = harness.booth.publisher();

    publisher
        .submit(PhotoSubmission::new("%%% definitely not base64 %%%"))
        .await
        .unwrap();
    publisher
        .submit(PhotoSubmission::new(submission(8, 8, ImageFormat::Gif)))
        .await
        .unwrap();
    publisher
        .submit(PhotoSubmission::new(submission(40, 30, ImageFormat::Png)))
        .await
        .unwrap();

    let records = harness.settle(1).await;
    assert_eq!(records.len(), 1);
    assert_eq!(dims(&records[0].variant_50), (20, 15));
}

#[tokio::test]
async fn deleted_photo_stays_readable_and_cannot_be_deleted_twice() {
    let harness = Harness::start();
    harness
        .booth
        .publisher()
        .submit(PhotoSubmission::new(submission(64, 48, ImageFormat::Png)))
        .await
        .unwrap();
    let id = harness.settle(1).await[0].id;

    let photos = harness.booth.photos();
    photos.delete(id).await.unwrap();

    let photo = photos.get_by_id(id, "nonsense").await.unwrap();
    assert!(photo.is_deleted);
    assert_eq!(photo.data, harness.store.records().await[0].origin);

    assert!(matches!(
        photos.delete(id).await,
        Err(StoreError::NotFoundOrAlreadyDeleted(_))
    ));
}
